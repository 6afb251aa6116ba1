// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for block range and sampling calculations.

/// Errors that can occur while building block ranges or sampling them.
///
/// # Examples
///
/// ```rust
/// use morphoscan::{BlockRange, BlockRangeError};
///
/// match BlockRange::new(200, 100) {
///     Err(BlockRangeError::InvalidRange { start, end }) => {
///         assert_eq!((start, end), (200, 100));
///     }
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockRangeError {
    /// The start block is after the end block.
    #[error("Invalid block range: start block {start} is after end block {end}")]
    InvalidRange {
        /// Requested first block
        start: u64,
        /// Requested last block
        end: u64,
    },

    /// A sampling step of zero blocks would never advance.
    #[error("Sampling step must be at least one block")]
    ZeroStep,
}

impl BlockRangeError {
    /// Create an `InvalidRange` error for the given bounds.
    pub fn invalid_range(start: u64, end: u64) -> Self {
        BlockRangeError::InvalidRange { start, end }
    }
}
