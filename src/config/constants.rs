// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known addresses and constants
//!
//! This module centralizes the on-chain identifiers and tuning constants used
//! by the market tracker.

use alloy_primitives::{address, b256, Address, B256};
use std::time::Duration;

/// Morpho Blue deployments
pub mod morpho {
    use super::*;

    /// Morpho Blue singleton on Base
    ///
    /// Contract: 0xBBBBBbbBBb9cC5e90e3b3Af64bdAF62C37EEFFCb
    pub const MORPHO_BLUE: Address = address!("bbbbbbbbbb9cc5e90e3b3af64bdaf62c37eeffcb");

    /// cbBTC/USDC market unique key on Base
    pub const CBBTC_USDC_MARKET_ID: B256 =
        b256!("9103c3b4e834476c9a62ea009ba2c884ee42e94e6e314a26f04d312434191836");

    /// Block at which the cbBTC/USDC market was created
    pub const CBBTC_USDC_CREATION_BLOCK: u64 = 19_326_981;

    /// Hosted Morpho GraphQL endpoint
    pub const MORPHO_API_URL: &str = "https://blue-api.morpho.org/graphql";

    /// Virtual shares added to share totals in Morpho share math
    pub const VIRTUAL_SHARES: u128 = 1_000_000;

    /// Virtual assets added to asset totals in Morpho share math
    pub const VIRTUAL_ASSETS: u128 = 1;

    /// Fixed-point scale of LLTV values (18 decimals)
    pub const WAD: u128 = 1_000_000_000_000_000_000;
}

/// Token decimals for the tracked market
pub mod tokens {
    /// USDC decimals (loan asset)
    pub const USDC_DECIMALS: u8 = 6;

    /// cbBTC decimals (collateral asset)
    pub const CBBTC_DECIMALS: u8 = 8;

    /// Loan asset symbol used in console output
    pub const USDC_SYMBOL: &str = "USDC";
}

/// Sampling defaults
pub mod sampling {
    use super::*;

    /// Default last block of the tracked history
    pub const DEFAULT_END_BLOCK: u64 = 27_750_945;

    /// Blocks between samples, about 7 days of Base blocks (2 second block time)
    pub const DEFAULT_SAMPLE_STEP: u64 = 302_400;

    /// Pause between consecutive samples
    pub const DEFAULT_SAMPLE_DELAY: Duration = Duration::from_millis(500);
}

/// Default filesystem locations, relative to the working directory
pub mod paths {
    /// Sample cache file
    pub const DEFAULT_CACHE_PATH: &str = "cache/morpho_market_data.json";

    /// Directory for CSV/JSON exports
    pub const DEFAULT_OUTPUT_DIR: &str = "raw-data";

    /// History CSV file name inside the output directory
    pub const HISTORY_CSV: &str = "morpho_market_history.csv";

    /// Projection summary file name inside the output directory
    pub const PROJECTION_JSON: &str = "morpho_market_projection.json";
}
