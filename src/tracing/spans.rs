// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for morphoscan operations.
//!
//! Telemetry is kept out of business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a span helper here.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, block: BlockNumber) -> Result<T> {
//!     async {
//!         // Business logic here
//!     }
//!     .instrument(spans::my_operation(block))
//!     .await
//! }
//! ```

use alloy_primitives::{Address, BlockNumber};
use std::path::Path;
use tracing::{Level, Span};

use crate::blocks::BlockRange;
use crate::market::MarketId;

/// Create span for collecting the sampled history of a block range.
///
/// This is the main public API entry point for history collection.
///
/// Parent: None (root span for this operation)
/// Children: cache_load, fetch_sample and cache_save spans
#[inline]
pub(crate) fn collect_history(range: BlockRange, step: u64, use_cache: bool) -> Span {
    tracing::span!(
        Level::INFO,
        "morphoscan.collect_history",
        start_block = range.start(),
        end_block = range.end(),
        step = step,
        use_cache = use_cache,
    )
}

/// Create span for fetching one market sample.
///
/// Parent: collect_history span
/// Children: market_state and get_block_timestamp spans
#[inline]
pub(crate) fn fetch_sample(block_number: BlockNumber) -> Span {
    tracing::debug_span!("morphoscan.fetch_sample", block_number = block_number)
}

/// Create span for the `market(id)` view call.
///
/// Parent: fetch_sample span
/// Children: RPC `eth_call`
#[inline]
pub(crate) fn market_state(market_id: MarketId, block_number: BlockNumber) -> Span {
    tracing::trace_span!(
        "morphoscan.market_state",
        market_id = %market_id,
        block_number = block_number,
    )
}

/// Create span for fetching block timestamp.
///
/// Parent: fetch_sample span
/// Children: RPC call to get block
#[inline]
pub(crate) fn get_block_timestamp(block_number: BlockNumber) -> Span {
    tracing::trace_span!("morphoscan.get_block_timestamp", block_number = block_number)
}

/// Create span for reading the sample cache.
///
/// Parent: collect_history span
#[inline]
pub(crate) fn cache_load(path: &Path, range: BlockRange) -> Span {
    tracing::debug_span!(
        "morphoscan.cache_load",
        path = %path.display(),
        start_block = range.start(),
        end_block = range.end(),
    )
}

/// Create span for writing the sample cache.
///
/// Parent: collect_history span
#[inline]
pub(crate) fn cache_save(path: &Path, records: usize) -> Span {
    tracing::debug_span!(
        "morphoscan.cache_save",
        path = %path.display(),
        records = records,
    )
}

/// Create span for a Morpho GraphQL API request.
///
/// Parent: None (root span for this operation)
/// Children: HTTP request
#[inline]
pub(crate) fn market_creation(unique_key: &str, chain_id: u64) -> Span {
    tracing::span!(
        Level::INFO,
        "morphoscan.market_creation",
        unique_key = unique_key,
        chain_id = chain_id,
    )
}

/// Create span for computing one position's liquidation price on-chain.
///
/// Parent: None (root span for this operation)
/// Children: `position`, `market`, `idToMarketParams` and `decimals` calls
#[inline]
pub(crate) fn position_liquidation(user: Address, block_number: BlockNumber) -> Span {
    tracing::span!(
        Level::INFO,
        "morphoscan.position_liquidation",
        user = %user,
        block_number = block_number,
    )
}
