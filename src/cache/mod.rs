// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache backends for sampled market history
//!
//! A cache holds the complete record set for exactly one block range:
//!
//! - [`DiskCache`]: versioned JSON file, written once per fetch run (default)
//! - [`NoOpCache`]: disables caching entirely (`--no-cache`)
//!
//! # Examples
//!
//! ```rust,ignore
//! use morphoscan::cache::{DiskCache, NoOpCache};
//! use morphoscan::HistoryCollector;
//!
//! // Disk cache at the default location
//! let cache = DiskCache::new("cache/morpho_market_data.json").validate()?;
//! let collector = HistoryCollector::new(reader, Box::new(cache));
//!
//! // No cache (always fetch)
//! let collector = HistoryCollector::new(reader, Box::new(NoOpCache));
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blocks::BlockRange;
use crate::errors::CacheError;
use crate::market::SampleRecord;

mod disk;
mod noop;

pub use disk::DiskCache;
pub use noop::NoOpCache;

/// Current cache format version
pub const CACHE_VERSION: u32 = 1;

/// Persisted wrapper around a record set and the range it was fetched for
///
/// The `(start_block, end_block)` pair is the validity key: an envelope is
/// only reused for the identical range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    /// Cache format version
    pub version: u32,
    pub start_block: u64,
    pub end_block: u64,
    /// Records in ascending block order
    pub records: Vec<SampleRecord>,
    /// When the envelope was written
    pub created_at: DateTime<Utc>,
}

impl CacheEnvelope {
    /// Wraps `records` fetched for `range`, stamped with the current time
    pub fn new(range: BlockRange, records: Vec<SampleRecord>) -> Self {
        Self {
            version: CACHE_VERSION,
            start_block: range.start(),
            end_block: range.end(),
            records,
            created_at: Utc::now(),
        }
    }

    /// Whether this envelope was written for exactly `range`
    pub fn covers(&self, range: BlockRange) -> bool {
        self.start_block == range.start() && self.end_block == range.end()
    }
}

/// Trait for sample cache backends
///
/// # Error Handling
///
/// Reads never fail: a missing, unreadable, outdated or mismatched cache is a
/// miss and implementations log the reason. Writes report errors so callers
/// can log them; a failed write must not abort a run.
#[async_trait]
pub trait SampleCache: Send + Sync {
    /// Records cached for exactly `range`, if any
    async fn load(&self, range: BlockRange) -> Option<Vec<SampleRecord>>;

    /// Replaces the cache contents with `records` for `range`
    ///
    /// Always overwrites. There is no merging with previously cached data.
    async fn save(&self, range: BlockRange, records: &[SampleRecord]) -> Result<(), CacheError>;

    /// Returns a human-readable name for this cache backend
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_covers_only_exact_range() {
        let range = BlockRange::new(100, 350).unwrap();
        let envelope = CacheEnvelope::new(range, Vec::new());

        assert_eq!(envelope.version, CACHE_VERSION);
        assert!(envelope.covers(range));
        assert!(!envelope.covers(BlockRange::new(100, 351).unwrap()));
        assert!(!envelope.covers(BlockRange::new(99, 350).unwrap()));
    }
}
