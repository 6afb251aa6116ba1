// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Compound growth: a fixed rate per 30-day month

use super::SeriesGrowth;

/// Monthly growth rates above 30% are clamped
pub const MONTHLY_RATE_CAP: f64 = 0.30;

/// Monthly rate that turns `first` into `last` over `days` whole days
///
/// `first` must be non-zero.
pub(super) fn monthly_growth(first: f64, last: f64, days: i64) -> SeriesGrowth {
    let rate = (last / first).powf(30.0 / days as f64) - 1.0;
    SeriesGrowth::Compound {
        monthly_rate: rate.min(MONTHLY_RATE_CAP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(growth: SeriesGrowth) -> f64 {
        match growth {
            SeriesGrowth::Compound { monthly_rate } => monthly_rate,
            SeriesGrowth::Linear { .. } => panic!("expected compound growth"),
        }
    }

    #[test]
    fn ten_percent_over_one_month() {
        assert!((rate(monthly_growth(1_000.0, 1_100.0, 30)) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn rate_compounds_back_to_last_value() {
        let growth = monthly_growth(1_000.0, 1_210.0, 60);
        assert!((growth.project(1_000.0, 60.0, 1.0) - 1_210.0).abs() < 1e-9);
    }

    #[test]
    fn caps_fast_growth() {
        assert_eq!(rate(monthly_growth(1.0, 100.0, 30)), MONTHLY_RATE_CAP);
    }

    #[test]
    fn total_loss_is_minus_one() {
        assert_eq!(rate(monthly_growth(1_000.0, 0.0, 30)), -1.0);
    }
}
