// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Liquidation price analytics
//!
//! - [`math`]: share-to-asset conversion and the liquidation price formula
//! - [`positions`]: distribution of liquidation prices in a positions export
//! - [`position_liquidation`]: one borrower's liquidation price read on-chain
//!
//! # Examples
//!
//! ```rust,ignore
//! use morphoscan::liquidation::position_liquidation;
//!
//! let result = position_liquidation(&reader, user, 27_884_440).await?;
//! match result.liquidation_price {
//!     Some(price) => println!("liquidated below ${price:.2}"),
//!     None => println!("no collateral"),
//! }
//! ```

use alloy_network::Network;
use alloy_primitives::{Address, BlockNumber};
use alloy_provider::Provider;
use serde::Serialize;
use tracing::{info, Instrument};

use crate::errors::LiquidationError;
use crate::market::{MarketReader, MorphoReader};
use crate::tracing::spans;

pub mod math;
pub mod positions;

pub use math::{liquidation_price, lltv_to_fraction, mul_div_up, to_assets_up};
pub use positions::{analyze, load_positions, parse_positions, LiquidationReport, LiquidationRow};

/// Liquidation price of one position at one block
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionLiquidation {
    pub user: Address,
    pub block_number: BlockNumber,
    pub borrow_shares: u128,
    /// Borrowed assets in loan-token units, rounded up
    pub borrowed: f64,
    /// Collateral in collateral-token units
    pub collateral: f64,
    /// Liquidation loan-to-value as a fraction
    pub lltv: f64,
    /// Collateral price in loan-token units at which the position is liquidatable
    pub liquidation_price: Option<f64>,
}

/// Reads a borrower's position and computes its liquidation price at `block`
///
/// Borrowed assets are derived from borrow shares with the market totals at
/// the same block. Token decimals come from the loan and collateral tokens'
/// `decimals()`.
pub async fn position_liquidation<P, N>(
    reader: &MorphoReader<P, N>,
    user: Address,
    block: BlockNumber,
) -> Result<PositionLiquidation, LiquidationError>
where
    P: Provider<N> + Send + Sync,
    N: Network,
{
    async {
        let position = reader.position(user, block).await?;
        let state = reader.market_state(block).await?;
        let params = reader.market_params(block).await?;
        let loan_decimals = reader.token_decimals(params.loan_token, block).await?;
        let collateral_decimals = reader.token_decimals(params.collateral_token, block).await?;

        let borrowed_assets = to_assets_up(
            position.borrow_shares,
            state.total_borrow_assets,
            state.total_borrow_shares,
        );
        let borrowed = loan_decimals.normalize(borrowed_assets.saturating_to::<u128>());
        let collateral = collateral_decimals.normalize(position.collateral);
        let lltv = lltv_to_fraction(params.lltv);
        let price = liquidation_price(borrowed, collateral, lltv);

        info!(
            borrowed,
            collateral,
            lltv,
            liquidation_price = ?price,
            "Computed position liquidation price"
        );

        Ok::<_, LiquidationError>(PositionLiquidation {
            user,
            block_number: block,
            borrow_shares: position.borrow_shares,
            borrowed,
            collateral,
            lltv,
            liquidation_price: price,
        })
    }
    .instrument(spans::position_liquidation(user, block))
    .await
}
