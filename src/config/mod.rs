// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for market tracking runs
//!
//! Controls which market is tracked, which block range is sampled and how
//! densely, how fast the node is queried, and where cache and exports live.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use morphoscan::TrackerConfig;
//!
//! // cbBTC/USDC on Base, sampled about weekly from market creation
//! let config = TrackerConfig::default();
//! assert_eq!(config.sample_step, 302_400);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use morphoscan::TrackerConfigBuilder;
//! use std::time::Duration;
//!
//! let config = TrackerConfigBuilder::with_defaults()
//!     .end_block(28_000_000)
//!     .sample_delay(Duration::from_millis(250))
//!     .build();
//! ```

use std::path::PathBuf;
use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_primitives::Address;

use crate::blocks::{BlockRange, BlockSampler};
use crate::errors::BlockRangeError;
use crate::market::{MarketId, TokenDecimals};

pub mod constants;

use constants::{morpho, paths, sampling, tokens};

/// Configuration for a market tracking run
///
/// Use [`TrackerConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Chain the market lives on
    pub chain: NamedChain,

    /// Morpho Blue contract address
    pub morpho_address: Address,

    /// Market unique key
    pub market_id: MarketId,

    /// First block of the sampled history (inclusive)
    pub start_block: u64,

    /// Last block of the sampled history (inclusive)
    pub end_block: u64,

    /// Distance between consecutive samples, in blocks
    pub sample_step: u64,

    /// Pause between consecutive samples
    pub sample_delay: Duration,

    /// Location of the sample cache file
    pub cache_path: PathBuf,

    /// Directory for CSV/JSON exports
    pub output_dir: PathBuf,

    /// Decimals of the market's loan asset
    pub loan_decimals: TokenDecimals,

    /// Morpho GraphQL endpoint
    pub api_url: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::cbbtc_usdc_base()
    }
}

impl TrackerConfig {
    /// Configuration for the cbBTC/USDC market on Base
    pub fn cbbtc_usdc_base() -> Self {
        Self {
            chain: NamedChain::Base,
            morpho_address: morpho::MORPHO_BLUE,
            market_id: MarketId::new(morpho::CBBTC_USDC_MARKET_ID),
            start_block: morpho::CBBTC_USDC_CREATION_BLOCK,
            end_block: sampling::DEFAULT_END_BLOCK,
            sample_step: sampling::DEFAULT_SAMPLE_STEP,
            sample_delay: sampling::DEFAULT_SAMPLE_DELAY,
            cache_path: PathBuf::from(paths::DEFAULT_CACHE_PATH),
            output_dir: PathBuf::from(paths::DEFAULT_OUTPUT_DIR),
            loan_decimals: TokenDecimals::new(tokens::USDC_DECIMALS),
            api_url: morpho::MORPHO_API_URL.to_string(),
        }
    }

    /// Validated block range for this run
    ///
    /// # Errors
    ///
    /// Returns [`BlockRangeError::InvalidRange`] if `start_block > end_block`.
    pub fn block_range(&self) -> Result<BlockRange, BlockRangeError> {
        BlockRange::new(self.start_block, self.end_block)
    }

    /// Sampler using the configured step
    ///
    /// # Errors
    ///
    /// Returns [`BlockRangeError::ZeroStep`] if the step is zero.
    pub fn sampler(&self) -> Result<BlockSampler, BlockRangeError> {
        BlockSampler::new(self.sample_step)
    }

    /// Path of the history CSV export
    pub fn history_csv_path(&self) -> PathBuf {
        self.output_dir.join(paths::HISTORY_CSV)
    }

    /// Path of the projection JSON export
    pub fn projection_json_path(&self) -> PathBuf {
        self.output_dir.join(paths::PROJECTION_JSON)
    }
}

/// Builder for [`TrackerConfig`]
///
/// # Example
///
/// ```rust
/// use morphoscan::TrackerConfigBuilder;
///
/// let config = TrackerConfigBuilder::with_defaults()
///     .start_block(100)
///     .end_block(350)
///     .sample_step(100)
///     .build();
///
/// assert_eq!(config.block_range().unwrap().block_count(), 251);
/// ```
pub struct TrackerConfigBuilder {
    config: TrackerConfig,
}

impl Default for TrackerConfigBuilder {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TrackerConfigBuilder {
    /// Start from the cbBTC/USDC defaults
    pub fn with_defaults() -> Self {
        Self {
            config: TrackerConfig::default(),
        }
    }

    /// Set the Morpho Blue contract address
    pub fn morpho_address(mut self, address: Address) -> Self {
        self.config.morpho_address = address;
        self
    }

    /// Set the market unique key
    pub fn market_id(mut self, market_id: MarketId) -> Self {
        self.config.market_id = market_id;
        self
    }

    /// Set the first sampled block
    pub fn start_block(mut self, block: u64) -> Self {
        self.config.start_block = block;
        self
    }

    /// Set the last sampled block
    pub fn end_block(mut self, block: u64) -> Self {
        self.config.end_block = block;
        self
    }

    /// Set the sampling step in blocks
    pub fn sample_step(mut self, step: u64) -> Self {
        self.config.sample_step = step;
        self
    }

    /// Set the pause between samples
    pub fn sample_delay(mut self, delay: Duration) -> Self {
        self.config.sample_delay = delay;
        self
    }

    /// Set the cache file location
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cache_path = path.into();
        self
    }

    /// Set the export directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set the loan asset decimals
    pub fn loan_decimals(mut self, decimals: impl Into<TokenDecimals>) -> Self {
        self.config.loan_decimals = decimals.into();
        self
    }

    /// Set the Morpho GraphQL endpoint
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Build the final configuration
    pub fn build(self) -> TrackerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.chain, NamedChain::Base);
        assert_eq!(config.start_block, 19_326_981);
        assert_eq!(config.end_block, 27_750_945);
        assert_eq!(config.sample_delay, Duration::from_millis(500));
        assert_eq!(config.loan_decimals, TokenDecimals::USDC);
        assert!(config.block_range().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = TrackerConfigBuilder::with_defaults()
            .start_block(10)
            .end_block(20)
            .sample_step(5)
            .sample_delay(Duration::ZERO)
            .cache_path("/tmp/cache.json")
            .output_dir("/tmp/out")
            .build();

        assert_eq!(config.start_block, 10);
        assert_eq!(config.end_block, 20);
        assert_eq!(config.sample_delay, Duration::ZERO);
        assert_eq!(
            config.history_csv_path(),
            PathBuf::from("/tmp/out/morpho_market_history.csv")
        );
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let config = TrackerConfigBuilder::with_defaults()
            .start_block(20)
            .end_block(10)
            .build();
        assert_eq!(
            config.block_range(),
            Err(BlockRangeError::invalid_range(20, 10))
        );
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let config = TrackerConfigBuilder::with_defaults().sample_step(0).build();
        assert_eq!(config.sampler().unwrap_err(), BlockRangeError::ZeroStep);
    }
}
