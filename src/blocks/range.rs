// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Inclusive block ranges

use alloy_primitives::BlockNumber;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::BlockRangeError;

/// An inclusive block range `[start, end]`
///
/// A range is the unit of work for history collection and the validity key
/// of the disk cache: cached records are only reused for the exact same
/// `(start, end)` pair.
///
/// # Examples
///
/// ```
/// use morphoscan::BlockRange;
///
/// let range = BlockRange::new(100, 350).unwrap();
/// assert_eq!(range.start(), 100);
/// assert_eq!(range.end(), 350);
/// assert!(range.contains(350));
/// assert!(!range.contains(351));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRange {
    start: BlockNumber,
    end: BlockNumber,
}

impl BlockRange {
    /// Creates a range, rejecting `start > end`
    ///
    /// `start == end` is allowed and describes a single block.
    pub fn new(start: BlockNumber, end: BlockNumber) -> Result<Self, BlockRangeError> {
        if start > end {
            return Err(BlockRangeError::invalid_range(start, end));
        }
        Ok(Self { start, end })
    }

    /// First block (inclusive)
    pub fn start(&self) -> BlockNumber {
        self.start
    }

    /// Last block (inclusive)
    pub fn end(&self) -> BlockNumber {
        self.end
    }

    /// Number of blocks covered by the range, saturating at `u64::MAX`
    pub fn block_count(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Whether `block` lies inside the range
    pub fn contains(&self, block: BlockNumber) -> bool {
        (self.start..=self.end).contains(&block)
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reversed_range() {
        assert_eq!(
            BlockRange::new(10, 9),
            Err(BlockRangeError::InvalidRange { start: 10, end: 9 })
        );
    }

    #[test]
    fn single_block_range() {
        let range = BlockRange::new(5, 5).unwrap();
        assert_eq!(range.block_count(), 1);
        assert!(range.contains(5));
        assert_eq!(range.to_string(), "[5, 5]");
    }

    #[test]
    fn full_range_block_count_saturates() {
        let range = BlockRange::new(0, u64::MAX).unwrap();
        assert_eq!(range.block_count(), u64::MAX);
        assert!(range.contains(u64::MAX));
    }

    #[test]
    fn serializes_as_start_end_pair() {
        let range = BlockRange::new(1, 2).unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"start":1,"end":2}"#);

        let back: BlockRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
    }
}
