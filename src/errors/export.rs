// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for CSV/JSON result exports.

/// Errors that can occur while writing result exports.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Filesystem error creating the output directory or file.
    #[error("Export I/O error at {path}: {source}")]
    Io {
        /// Path that could not be written
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Create an `Io` error for a path.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}
