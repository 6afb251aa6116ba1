// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Disk-based cache implementation with versioning and atomic writes

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Instrument};

use super::{CacheEnvelope, SampleCache, CACHE_VERSION};
use crate::blocks::BlockRange;
use crate::errors::CacheError;
use crate::market::SampleRecord;
use crate::tracing::spans;

/// Disk-based cache storing one [`CacheEnvelope`] as pretty-printed JSON
///
/// - A missing file, a parse failure, a version mismatch or a range mismatch
///   is a cache miss
/// - Saves write to a sibling temp file and rename it over the cache file
/// - No file locking: concurrent runs against the same file may race
///
/// # Examples
///
/// ```rust,ignore
/// use morphoscan::cache::DiskCache;
///
/// let cache = DiskCache::new("cache/morpho_market_data.json").validate()?;
/// ```
#[derive(Debug, Clone)]
pub struct DiskCache {
    path: PathBuf,
}

impl DiskCache {
    /// Creates a new disk cache at the specified path
    ///
    /// Path validation is NOT performed until the first I/O operation. Use
    /// [`validate()`](Self::validate) to check the path immediately.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn validate(self) -> Result<Self, CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CacheError::io(
                        parent.display().to_string(),
                        "Failed to create cache directory",
                        e,
                    )
                })?;
                debug!(path = %parent.display(), "Created cache directory");
            }
        }

        debug!(path = %self.path.display(), "Cache path validated successfully");
        Ok(self)
    }

    /// Reads and validates the envelope on disk
    ///
    /// Returns `None` (after logging why) for every kind of miss.
    async fn read_envelope(&self, range: BlockRange) -> Option<CacheEnvelope> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Cache file does not exist");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read cache file, treating as miss");
                return None;
            }
        };

        let envelope: CacheEnvelope = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to parse cache file, treating as miss"
                );
                return None;
            }
        };

        if envelope.version != CACHE_VERSION {
            warn!(
                path = %self.path.display(),
                cached_version = envelope.version,
                current_version = CACHE_VERSION,
                "Cache version mismatch, ignoring cached data"
            );
            return None;
        }

        if !envelope.covers(range) {
            info!(
                cached_start = envelope.start_block,
                cached_end = envelope.end_block,
                requested_start = range.start(),
                requested_end = range.end(),
                "Cached block range does not match, fetching fresh data"
            );
            return None;
        }

        Some(envelope)
    }

    /// Writes the envelope via temp file and rename
    async fn write_envelope(&self, envelope: &CacheEnvelope) -> Result<(), CacheError> {
        // Serialize first so a serialization error never touches the file
        let json = serde_json::to_vec_pretty(envelope)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    CacheError::io(
                        parent.display().to_string(),
                        "Failed to create cache directory. Ensure you have write permissions.",
                        e,
                    )
                })?;
            }
        }

        let temp_path = self.path.with_extension("tmp");

        tokio::fs::write(&temp_path, &json).await.map_err(|e| {
            CacheError::io(
                temp_path.display().to_string(),
                "Failed to write temp cache file",
                e,
            )
        })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| {
                CacheError::io(
                    self.path.display().to_string(),
                    format!("Failed to rename cache file from '{}'", temp_path.display()),
                    e,
                )
            })?;

        Ok(())
    }
}

#[async_trait]
impl SampleCache for DiskCache {
    async fn load(&self, range: BlockRange) -> Option<Vec<SampleRecord>> {
        async {
            let envelope = self.read_envelope(range).await?;

            info!(
                path = %self.path.display(),
                records = envelope.records.len(),
                created_at = %envelope.created_at,
                "Loaded market history from cache"
            );
            Some(envelope.records)
        }
        .instrument(spans::cache_load(&self.path, range))
        .await
    }

    async fn save(&self, range: BlockRange, records: &[SampleRecord]) -> Result<(), CacheError> {
        async {
            let envelope = CacheEnvelope::new(range, records.to_vec());
            self.write_envelope(&envelope).await?;

            info!(
                path = %self.path.display(),
                records = records.len(),
                "Saved market history to cache"
            );
            Ok::<_, CacheError>(())
        }
        .instrument(spans::cache_save(&self.path, records.len()))
        .await
    }

    fn name(&self) -> &'static str {
        "DiskCache"
    }
}
