// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Market history collection
//!
//! [`HistoryCollector`] composes the pieces of a tracking run: sample the
//! block range, read each sampled block, and persist the result set once.
//! Subsequent runs for the same range are served from the cache without
//! touching the node.
//!
//! # Examples
//!
//! ```rust,ignore
//! use morphoscan::{BlockRange, CollectOptions, HistoryCollector, TokenDecimals};
//! use morphoscan::cache::DiskCache;
//!
//! let cache = DiskCache::new("cache/morpho_market_data.json").validate()?;
//! let collector = HistoryCollector::new(reader, Box::new(cache));
//!
//! let range = BlockRange::new(19_326_981, 27_750_945)?;
//! let history = collector.collect(range, CollectOptions::default()).await?;
//!
//! for point in history.points(TokenDecimals::USDC) {
//!     println!("{}: {:.2}%", point.block_number, point.utilization_rate);
//! }
//! ```

use std::time::Duration;

use alloy_primitives::BlockNumber;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Instrument};

use crate::blocks::{BlockRange, BlockSampler};
use crate::cache::SampleCache;
use crate::config::constants::sampling::DEFAULT_SAMPLE_DELAY;
use crate::errors::HistoryError;
use crate::market::{fetch_sample, MarketReader, SampleRecord, TokenDecimals, UnixTimestamp};
use crate::tracing::spans;

/// Cache behaviour for one collection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    /// Read and write the cache (`false` for `--no-cache`)
    pub use_cache: bool,
    /// Ignore cached data and overwrite it after fetching (`--force-refresh`)
    pub force_refresh: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
        }
    }
}

/// Ordered market samples for one block range
///
/// Records are in ascending block order with no duplicate blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketHistory {
    range: BlockRange,
    records: Vec<SampleRecord>,
    from_cache: bool,
}

impl MarketHistory {
    /// Builds a history, ordering records by block and dropping repeated blocks
    pub fn new(range: BlockRange, mut records: Vec<SampleRecord>, from_cache: bool) -> Self {
        records.sort_by_key(|r| r.block_number);
        records.dedup_by_key(|r| r.block_number);
        Self {
            range,
            records,
            from_cache,
        }
    }

    /// Range the history was collected for
    pub fn range(&self) -> BlockRange {
        self.range
    }

    /// Sampled records in ascending block order
    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    /// Consumes the history, returning its records
    pub fn into_records(self) -> Vec<SampleRecord> {
        self.records
    }

    /// Whether the records were served from the cache
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records normalized by the loan token's decimals
    pub fn points(&self, decimals: TokenDecimals) -> Vec<NormalizedPoint> {
        self.records
            .iter()
            .map(|record| NormalizedPoint::from_record(record, decimals))
            .collect()
    }
}

/// A sampled record in human-readable loan-token units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub block_number: BlockNumber,
    pub timestamp: UnixTimestamp,
    pub total_supply: f64,
    pub total_borrow: f64,
    /// Supply minus borrow
    pub available_liquidity: f64,
    /// Percentage, `0` when supply is zero
    pub utilization_rate: f64,
}

impl NormalizedPoint {
    /// Normalizes a raw record
    pub fn from_record(record: &SampleRecord, decimals: TokenDecimals) -> Self {
        let total_supply = decimals.normalize(record.total_supply_assets);
        let total_borrow = decimals.normalize(record.total_borrow_assets);
        Self {
            block_number: record.block_number,
            timestamp: record.timestamp,
            total_supply,
            total_borrow,
            available_liquidity: total_supply - total_borrow,
            utilization_rate: record.utilization_rate,
        }
    }

    /// UTC calendar date of the sampled block
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.date()
    }
}

/// Collects sampled market history through a reader and a cache
pub struct HistoryCollector<R> {
    reader: R,
    cache: Box<dyn SampleCache>,
    sampler: BlockSampler,
    sample_delay: Duration,
}

impl<R: MarketReader> HistoryCollector<R> {
    /// Creates a collector with the default weekly step and 500 ms delay
    pub fn new(reader: R, cache: Box<dyn SampleCache>) -> Self {
        Self {
            reader,
            cache,
            sampler: BlockSampler::default(),
            sample_delay: DEFAULT_SAMPLE_DELAY,
        }
    }

    /// Replaces the block sampler
    pub fn with_sampler(mut self, sampler: BlockSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Sets the pause between consecutive samples
    pub fn with_sample_delay(mut self, delay: Duration) -> Self {
        self.sample_delay = delay;
        self
    }

    /// The reader used for live fetches
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Name of the configured cache backend
    pub fn cache_name(&self) -> &'static str {
        self.cache.name()
    }

    /// Collects history for `range`
    ///
    /// 1. Unless caching is disabled or a refresh is forced, a cache hit for
    ///    the exact range is returned without any RPC call.
    /// 2. Otherwise every sampled block is fetched in order. A block whose
    ///    reads fail is logged and left out; the run continues.
    /// 3. A non-empty result is written to the cache when caching is enabled.
    ///    A failed write is logged and does not fail the run.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Rpc`] if the chain tip cannot be read before
    /// fetching, and [`HistoryError::BeyondChainTip`] if the range ends after
    /// the chain tip.
    pub async fn collect(
        &self,
        range: BlockRange,
        options: CollectOptions,
    ) -> Result<MarketHistory, HistoryError> {
        let span = spans::collect_history(range, self.sampler.step(), options.use_cache);

        async {
            if options.use_cache && !options.force_refresh {
                if let Some(records) = self.cache.load(range).await {
                    return Ok(MarketHistory::new(range, records, true));
                }
            }

            let latest_block = self.reader.latest_block().await?;
            if range.end() > latest_block {
                return Err(HistoryError::BeyondChainTip {
                    end_block: range.end(),
                    latest_block,
                });
            }

            let records = self.fetch_range(range).await;

            if options.use_cache && !records.is_empty() {
                if let Err(e) = self.cache.save(range, &records).await {
                    warn!(
                        cache = self.cache.name(),
                        error = %e,
                        "Failed to save market history to cache"
                    );
                }
            }

            Ok::<_, HistoryError>(MarketHistory::new(range, records, false))
        }
        .instrument(span)
        .await
    }

    /// Fetches every sampled block, skipping failures
    async fn fetch_range(&self, range: BlockRange) -> Vec<SampleRecord> {
        let blocks = self.sampler.sample(&range);
        let total = blocks.len();
        let mut records = Vec::with_capacity(total);

        info!(
            start_block = range.start(),
            end_block = range.end(),
            samples = total,
            "Querying market data at each sampled block"
        );

        for (i, block) in blocks.into_iter().enumerate() {
            if i > 0 && !self.sample_delay.is_zero() {
                tokio::time::sleep(self.sample_delay).await;
            }

            info!(block, progress = %format!("{}/{}", i + 1, total), "Querying block");

            match fetch_sample(&self.reader, block).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(block, error = %e, "Failed to query block, skipping sample");
                }
            }
        }

        info!(
            fetched = records.len(),
            skipped = total - records.len(),
            "Finished querying market data"
        );

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MarketState;

    fn record(block: u64, supply: u128, borrow: u128) -> SampleRecord {
        SampleRecord::new(
            block,
            UnixTimestamp(1_725_148_800),
            MarketState {
                total_supply_assets: supply,
                total_borrow_assets: borrow,
                ..MarketState::default()
            },
        )
    }

    #[test]
    fn history_orders_and_dedups_records() {
        let range = BlockRange::new(1, 3).unwrap();
        let history = MarketHistory::new(
            range,
            vec![record(3, 1, 0), record(1, 1, 0), record(3, 1, 0), record(2, 1, 0)],
            false,
        );

        let blocks: Vec<u64> = history.records().iter().map(|r| r.block_number).collect();
        assert_eq!(blocks, vec![1, 2, 3]);
    }

    #[test]
    fn points_are_normalized() {
        let range = BlockRange::new(1, 1).unwrap();
        let history = MarketHistory::new(range, vec![record(1, 5_000_000, 2_000_000)], true);

        let points = history.points(TokenDecimals::USDC);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].total_supply, 5.0);
        assert_eq!(points[0].total_borrow, 2.0);
        assert_eq!(points[0].available_liquidity, 3.0);
        assert_eq!(points[0].utilization_rate, 40.0);
        assert_eq!(points[0].date(), NaiveDate::from_ymd_opt(2024, 9, 1));
    }

    #[test]
    fn default_options_use_cache() {
        let options = CollectOptions::default();
        assert!(options.use_cache);
        assert!(!options.force_refresh);
    }
}
