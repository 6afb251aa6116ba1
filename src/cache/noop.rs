// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! No-operation cache that disables caching entirely

use async_trait::async_trait;

use super::SampleCache;
use crate::blocks::BlockRange;
use crate::errors::CacheError;
use crate::market::SampleRecord;

/// A no-operation cache that disables caching entirely
///
/// This cache backend always returns `None` for reads and ignores writes.
/// It backs the `--no-cache` flag, which neither reads nor writes the cache
/// file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

#[async_trait]
impl SampleCache for NoOpCache {
    async fn load(&self, _range: BlockRange) -> Option<Vec<SampleRecord>> {
        None
    }

    async fn save(&self, _range: BlockRange, _records: &[SampleRecord]) -> Result<(), CacheError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NoOpCache"
    }
}
