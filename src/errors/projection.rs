// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for growth projections.

/// Reasons a growth projection cannot be computed from a history.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    /// Not enough points with non-zero supply.
    #[error("Insufficient data for {stage}: need at least {required} points, have {available}")]
    InsufficientData {
        /// Which eligibility check failed ("history" or "recent window")
        stage: &'static str,
        /// Minimum number of points needed
        required: usize,
        /// Number of points available
        available: usize,
    },

    /// The measurement window spans less than one whole day.
    #[error("Measurement window spans {days} days, too short for a growth rate")]
    WindowTooShort {
        /// Whole days between first and last point in the window
        days: i64,
    },

    /// The baseline value is zero, so a relative rate is undefined.
    #[error("Baseline {field} is zero, growth rate is undefined")]
    ZeroBaseline {
        /// Which series had a zero baseline ("supply" or "borrow")
        field: &'static str,
    },
}

impl ProjectionError {
    /// Create an `InsufficientData` error.
    pub fn insufficient_data(stage: &'static str, required: usize, available: usize) -> Self {
        ProjectionError::InsufficientData {
            stage,
            required,
            available,
        }
    }
}
