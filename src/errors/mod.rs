// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the morphoscan library.
//!
//! This module follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`BlockRangeError`],
//!   [`HistoryError`], [`ProjectionError`], ...)
//! - **Unified error type** ([`MorphoscanError`]) for callers that don't need to
//!   distinguish between error sources
//!
//! [`RpcError`] provides shared variants for blockchain RPC operations and is
//! wrapped by the module errors that talk to a node.
//!
//! # Examples
//!
//! ```rust,ignore
//! use morphoscan::{MorphoscanError, HistoryCollector};
//!
//! async fn run() -> Result<(), MorphoscanError> {
//!     let history = collector.collect(range, options).await?;
//!     let projection = project(&history.points(6), ProjectionMode::Linear)?;
//!     Ok(())
//! }
//! ```

mod api;
mod blocks;
mod cache;
mod export;
mod history;
mod liquidation;
mod projection;
mod rpc;

pub use api::ApiError;
pub use blocks::BlockRangeError;
pub use cache::CacheError;
pub use export::ExportError;
pub use history::HistoryError;
pub use liquidation::LiquidationError;
pub use projection::ProjectionError;
pub use rpc::RpcError;

/// Unified error type for all morphoscan operations.
///
/// All module-specific error types convert into `MorphoscanError` via `From`,
/// so `?` propagates them naturally.
#[derive(Debug, thiserror::Error)]
pub enum MorphoscanError {
    /// Error from block range construction or sampling.
    #[error("Block range error: {0}")]
    BlockRange(#[from] BlockRangeError),

    /// Error from market history collection.
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Error persisting the sample cache.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Error computing growth projections.
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Error from liquidation analytics.
    #[error("Liquidation error: {0}")]
    Liquidation(#[from] LiquidationError),

    /// Error from the Morpho GraphQL API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Error writing exports.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// RPC error outside of a more specific operation.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Error configuring the RPC provider.
    #[error("Provider error: {0}")]
    Provider(#[from] crate::provider::ProviderError),
}
