// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for liquidation analytics.

use super::RpcError;

/// Errors that can occur while analysing liquidation prices.
#[derive(Debug, thiserror::Error)]
pub enum LiquidationError {
    /// Reading the positions file failed.
    #[error("Failed to read positions file {path}: {source}")]
    Io {
        /// Path of the positions file
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The positions file is not valid JSON of the expected shape.
    #[error("Failed to parse positions file: {0}")]
    Parse(#[from] serde_json::Error),

    /// No position has collateral and a liquidation price.
    #[error("No positions with collateral and a liquidation price")]
    NoPositions,

    /// Histogram parameters are unusable.
    #[error("Invalid histogram: {reason}")]
    InvalidHistogram {
        /// Why the histogram could not be built
        reason: String,
    },

    /// RPC error while reading a position on-chain.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

impl LiquidationError {
    /// Create an `InvalidHistogram` error.
    pub fn invalid_histogram(reason: impl Into<String>) -> Self {
        LiquidationError::InvalidHistogram {
            reason: reason.into(),
        }
    }
}
