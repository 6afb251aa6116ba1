// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Linear growth: a fixed amount per day

use super::SeriesGrowth;

/// Daily growth is capped at this fraction of the window's first value
pub const DAILY_GROWTH_CAP: f64 = 0.008;

/// Average daily change between `first` and `last` over `days` whole days
///
/// Growth faster than 0.8% of `first` per day is clamped. Declines are not.
pub(super) fn daily_growth(first: f64, last: f64, days: i64) -> SeriesGrowth {
    let daily = (last - first) / days as f64;
    SeriesGrowth::Linear {
        daily_amount: daily.min(first * DAILY_GROWTH_CAP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_change_per_day() {
        assert_eq!(
            daily_growth(1_000.0, 1_100.0, 50),
            SeriesGrowth::Linear { daily_amount: 2.0 }
        );
    }

    #[test]
    fn caps_fast_growth() {
        assert_eq!(
            daily_growth(1_000.0, 10_000.0, 10),
            SeriesGrowth::Linear { daily_amount: 8.0 }
        );
    }

    #[test]
    fn keeps_declines() {
        assert_eq!(
            daily_growth(1_000.0, 900.0, 10),
            SeriesGrowth::Linear {
                daily_amount: -10.0
            }
        );
    }

    #[test]
    fn annualizes_against_first_value() {
        let growth = daily_growth(1_000.0, 1_100.0, 50);
        assert!((growth.annualized_rate(1_000.0) - 73.0).abs() < 1e-9);
    }
}
