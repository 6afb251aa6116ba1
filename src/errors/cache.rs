// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the sample cache.
//!
//! Cache read problems are never surfaced to callers (they are treated as a
//! miss), so in practice these errors come from writes.

/// Errors that can occur while persisting the sample cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Error reading from or writing to the cache file.
    #[error("Cache I/O error at {path}: {details}")]
    Io {
        /// Path to the cache file that caused the error
        path: String,
        /// Details about the I/O error
        details: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Error serializing or deserializing the cache envelope.
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Create an `Io` error with the offending path.
    pub fn io(
        path: impl Into<String>,
        details: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        CacheError::Io {
            path: path.into(),
            details: details.into(),
            source,
        }
    }
}
