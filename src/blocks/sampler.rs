// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Fixed-step interval sampling of block ranges
//!
//! The sampler walks a [`BlockRange`] from its start block in steps of `S`
//! blocks and always finishes on the range's end block, even when the end is
//! not a multiple of the step away from the start. Output is strictly
//! ascending and never contains duplicates.
//!
//! # Examples
//!
//! ```
//! use morphoscan::{BlockRange, BlockSampler};
//!
//! let sampler = BlockSampler::new(100).unwrap();
//! let range = BlockRange::new(100, 350).unwrap();
//! assert_eq!(sampler.sample(&range), vec![100, 200, 300, 350]);
//! ```

use alloy_primitives::BlockNumber;
use tracing::debug;

use crate::blocks::BlockRange;
use crate::config::constants::sampling::DEFAULT_SAMPLE_STEP;
use crate::errors::BlockRangeError;

/// Upper bound on the up-front allocation for one sample run
const MAX_PREALLOCATED_SAMPLES: u64 = 1 << 16;

/// Samples block numbers at a fixed step between two blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSampler {
    step: u64,
}

impl Default for BlockSampler {
    /// Samples about every 7 days of Base blocks
    fn default() -> Self {
        Self {
            step: DEFAULT_SAMPLE_STEP,
        }
    }
}

impl BlockSampler {
    /// Creates a sampler with the given step in blocks
    ///
    /// # Errors
    ///
    /// Returns [`BlockRangeError::ZeroStep`] when `step` is zero.
    pub fn new(step: u64) -> Result<Self, BlockRangeError> {
        if step == 0 {
            return Err(BlockRangeError::ZeroStep);
        }
        Ok(Self { step })
    }

    /// Step between samples in blocks
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Block numbers to sample for `range`
    ///
    /// Produces `start, start + step, ...` while `<= end`, then appends `end`
    /// if the walk did not land on it exactly.
    pub fn sample(&self, range: &BlockRange) -> Vec<BlockNumber> {
        let (start, end) = (range.start(), range.end());

        let capacity = ((end - start) / self.step)
            .saturating_add(2)
            .min(MAX_PREALLOCATED_SAMPLES) as usize;
        let mut blocks = Vec::with_capacity(capacity);

        let mut current = start;
        loop {
            blocks.push(current);
            match current.checked_add(self.step) {
                Some(next) if next <= end => current = next,
                _ => break,
            }
        }

        if current != end {
            blocks.push(end);
        }

        debug!(
            start,
            end,
            step = self.step,
            samples = blocks.len(),
            "Generated sample block numbers"
        );

        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(start: u64, end: u64, step: u64) -> Vec<u64> {
        let range = BlockRange::new(start, end).unwrap();
        BlockSampler::new(step).unwrap().sample(&range)
    }

    #[test]
    fn appends_end_block_when_not_on_step() {
        assert_eq!(sample(100, 350, 100), vec![100, 200, 300, 350]);
    }

    #[test]
    fn does_not_duplicate_end_block_on_step() {
        assert_eq!(sample(100, 300, 100), vec![100, 200, 300]);
    }

    #[test]
    fn single_block_range_yields_one_sample() {
        assert_eq!(sample(5, 5, 302_400), vec![5]);
    }

    #[test]
    fn step_larger_than_range() {
        assert_eq!(sample(10, 20, 1_000), vec![10, 20]);
    }

    #[test]
    fn step_of_one_covers_every_block() {
        assert_eq!(sample(7, 10, 1), vec![7, 8, 9, 10]);
    }

    #[test]
    fn near_u64_max_does_not_overflow() {
        let end = u64::MAX;
        let start = end - 10;
        assert_eq!(sample(start, end, 7), vec![start, start + 7, end]);
    }

    #[test]
    fn full_u64_range_does_not_overflow() {
        let step = u64::MAX / 2;
        assert_eq!(
            sample(0, u64::MAX, step),
            vec![0, step, step * 2, u64::MAX]
        );
    }

    #[test]
    fn zero_step_is_rejected() {
        assert_eq!(BlockSampler::new(0), Err(BlockRangeError::ZeroStep));
    }

    #[test]
    fn default_step_is_two_weeks() {
        assert_eq!(BlockSampler::default().step(), 302_400);
    }

    #[test]
    fn default_history_sample_count() {
        // 19_326_981 + 27 * 302_400 = 27_491_781 <= 27_750_945 < next step
        let samples = sample(19_326_981, 27_750_945, 302_400);
        assert_eq!(samples.len(), 29);
        assert_eq!(samples.first(), Some(&19_326_981));
        assert_eq!(samples.last(), Some(&27_750_945));
    }
}
