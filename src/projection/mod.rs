// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Growth projections from sampled market history
//!
//! Two mutually exclusive models estimate how supply and borrow grow:
//!
//! - [`ProjectionMode::Linear`]: a fixed absolute amount per day
//! - [`ProjectionMode::Compound`]: a fixed relative rate per 30-day month
//!
//! Both measure growth over the same window: the last 90 days of points
//! with non-zero supply. Each model is then extrapolated for 26 two-week
//! periods under three scenarios that scale the measured growth.
//!
//! # Examples
//!
//! ```rust,ignore
//! use morphoscan::projection::{project, ProjectionMode};
//! use morphoscan::TokenDecimals;
//!
//! let points = history.points(TokenDecimals::USDC);
//! match project(&points, ProjectionMode::Linear) {
//!     Ok(projection) => {
//!         for summary in projection.monthly_summaries() {
//!             println!("{}: {:.2}% supply growth per month", summary.scenario, summary.supply_rate);
//!         }
//!     }
//!     Err(e) => tracing::warn!(error = %e, "Skipping projections"),
//! }
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::errors::ProjectionError;
use crate::history::NormalizedPoint;
use crate::market::UnixTimestamp;

mod compound;
mod linear;

const SECONDS_PER_DAY: i64 = 86_400;

/// Minimum points with non-zero supply in the whole history
pub const MIN_HISTORY_POINTS: usize = 10;

/// Minimum points inside the measurement window
pub const MIN_WINDOW_POINTS: usize = 5;

/// Length of the measurement window, counted back from the latest point
pub const WINDOW_DAYS: i64 = 90;

/// Number of projected periods (one year)
pub const PROJECTION_PERIODS: u32 = 26;

/// Length of one projected period
pub const PERIOD_DAYS: u32 = 14;

/// Growth model used for extrapolation
///
/// Also the value type of the `--mode` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// Fixed absolute growth per day
    #[default]
    Linear,
    /// Fixed relative growth per 30-day month
    Compound,
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Linear => write!(f, "linear"),
            ProjectionMode::Compound => write!(f, "compound"),
        }
    }
}

impl FromStr for ProjectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(ProjectionMode::Linear),
            "compound" => Ok(ProjectionMode::Compound),
            other => Err(format!("unknown projection mode '{other}'")),
        }
    }
}

/// Scaling applied to the measured growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Full measured growth
    Bullish,
    /// Half the measured growth
    Neutral,
    /// A tenth of the measured growth
    Bearish,
}

impl Scenario {
    /// All scenarios, most optimistic first
    pub const ALL: [Scenario; 3] = [Scenario::Bullish, Scenario::Neutral, Scenario::Bearish];

    /// Fraction of the measured growth this scenario assumes
    pub fn factor(&self) -> f64 {
        match self {
            Scenario::Bullish => 1.0,
            Scenario::Neutral => 0.5,
            Scenario::Bearish => 0.1,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Bullish => write!(f, "Bullish"),
            Scenario::Neutral => write!(f, "Neutral"),
            Scenario::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Measured growth of one series (supply or borrow)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum SeriesGrowth {
    /// Absolute amount per day, capped
    Linear { daily_amount: f64 },
    /// Relative rate per 30-day month as a fraction, capped
    Compound { monthly_rate: f64 },
}

impl SeriesGrowth {
    /// Value after `days` days starting from `initial`, with growth scaled by `factor`
    pub fn project(&self, initial: f64, days: f64, factor: f64) -> f64 {
        match *self {
            SeriesGrowth::Linear { daily_amount } => initial + daily_amount * factor * days,
            SeriesGrowth::Compound { monthly_rate } => {
                initial * (1.0 + monthly_rate * factor).powf(days / 30.0)
            }
        }
    }

    /// Growth amount over one 30-day month from `initial`
    pub fn monthly_amount(&self, initial: f64, factor: f64) -> f64 {
        match *self {
            SeriesGrowth::Linear { daily_amount } => daily_amount * 30.0 * factor,
            SeriesGrowth::Compound { monthly_rate } => initial * monthly_rate * factor,
        }
    }

    /// Growth over one 30-day month as a percentage of `initial`
    pub fn monthly_rate(&self, initial: f64, factor: f64) -> f64 {
        match *self {
            SeriesGrowth::Linear { .. } => {
                if initial == 0.0 {
                    0.0
                } else {
                    self.monthly_amount(initial, factor) / initial * 100.0
                }
            }
            SeriesGrowth::Compound { monthly_rate } => monthly_rate * factor * 100.0,
        }
    }

    /// Growth over 365 days as a percentage of the window's first value
    ///
    /// Linear growth from a zero baseline reports `0`.
    pub fn annualized_rate(&self, baseline: f64) -> f64 {
        match *self {
            SeriesGrowth::Linear { .. } if baseline == 0.0 => 0.0,
            SeriesGrowth::Linear { daily_amount } => daily_amount * 365.0 / baseline * 100.0,
            SeriesGrowth::Compound { monthly_rate } => {
                ((1.0 + monthly_rate).powf(365.0 / 30.0) - 1.0) * 100.0
            }
        }
    }
}

/// The slice of history growth is measured over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementWindow {
    pub start: UnixTimestamp,
    pub end: UnixTimestamp,
    /// Whole days between the first and last point
    pub days: i64,
    /// Points inside the window
    pub points: usize,
    pub first_supply: f64,
    pub last_supply: f64,
    pub first_borrow: f64,
    pub last_borrow: f64,
}

impl MeasurementWindow {
    /// Selects the last 90 days of points with non-zero supply
    ///
    /// # Errors
    ///
    /// - [`ProjectionError::InsufficientData`] with fewer than 10 non-zero
    ///   points overall or fewer than 5 inside the window
    /// - [`ProjectionError::WindowTooShort`] when the window spans less than
    ///   one whole day
    pub fn select(points: &[NormalizedPoint]) -> Result<Self, ProjectionError> {
        let nonzero: Vec<&NormalizedPoint> =
            points.iter().filter(|p| p.total_supply > 0.0).collect();

        if nonzero.len() < MIN_HISTORY_POINTS {
            return Err(ProjectionError::insufficient_data(
                "history",
                MIN_HISTORY_POINTS,
                nonzero.len(),
            ));
        }

        let latest = nonzero
            .iter()
            .map(|p| p.timestamp)
            .max()
            .unwrap_or(UnixTimestamp(0));
        let cutoff = latest.0 - WINDOW_DAYS * SECONDS_PER_DAY;

        let recent: Vec<&NormalizedPoint> = nonzero
            .into_iter()
            .filter(|p| p.timestamp.0 >= cutoff)
            .collect();

        let (first, last) = match (recent.first(), recent.last()) {
            (Some(first), Some(last)) if recent.len() >= MIN_WINDOW_POINTS => (*first, *last),
            _ => {
                return Err(ProjectionError::insufficient_data(
                    "recent window",
                    MIN_WINDOW_POINTS,
                    recent.len(),
                ))
            }
        };

        let days = (last.timestamp.0 - first.timestamp.0).div_euclid(SECONDS_PER_DAY);
        if days <= 0 {
            return Err(ProjectionError::WindowTooShort { days });
        }

        Ok(Self {
            start: first.timestamp,
            end: last.timestamp,
            days,
            points: recent.len(),
            first_supply: first.total_supply,
            last_supply: last.total_supply,
            first_borrow: first.total_borrow,
            last_borrow: last.total_borrow,
        })
    }
}

/// One projected point of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub timestamp: UnixTimestamp,
    pub total_supply: f64,
    pub total_borrow: f64,
    pub available_liquidity: f64,
    pub utilization_rate: f64,
}

impl ProjectedPoint {
    fn new(timestamp: UnixTimestamp, total_supply: f64, total_borrow: f64) -> Self {
        let utilization_rate = if total_supply > 0.0 {
            total_borrow / total_supply * 100.0
        } else {
            0.0
        };
        Self {
            timestamp,
            total_supply,
            total_borrow,
            available_liquidity: total_supply - total_borrow,
            utilization_rate,
        }
    }
}

/// Projected points for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    pub scenario: Scenario,
    pub points: Vec<ProjectedPoint>,
}

/// Monthly growth summary for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub scenario: Scenario,
    /// Loan-token units per month
    pub supply_amount: f64,
    /// Percent per month
    pub supply_rate: f64,
    pub borrow_amount: f64,
    pub borrow_rate: f64,
}

/// Growth estimate plus its extrapolation under every scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub mode: ProjectionMode,
    pub window: MeasurementWindow,
    pub supply_growth: SeriesGrowth,
    pub borrow_growth: SeriesGrowth,
    /// Last historical supply, the starting point of every scenario
    pub initial_supply: f64,
    /// Last historical borrow, the starting point of every scenario
    pub initial_borrow: f64,
    /// Timestamp of the last historical point
    pub start: UnixTimestamp,
    pub scenarios: Vec<ScenarioProjection>,
}

impl GrowthProjection {
    /// Annualized supply growth in percent
    pub fn supply_annualized_rate(&self) -> f64 {
        self.supply_growth.annualized_rate(self.window.first_supply)
    }

    /// Annualized borrow growth in percent
    pub fn borrow_annualized_rate(&self) -> f64 {
        self.borrow_growth.annualized_rate(self.window.first_borrow)
    }

    /// Projected points of `scenario`
    pub fn scenario(&self, scenario: Scenario) -> Option<&ScenarioProjection> {
        self.scenarios.iter().find(|s| s.scenario == scenario)
    }

    /// Monthly growth amounts and rates per scenario
    pub fn monthly_summaries(&self) -> Vec<MonthlySummary> {
        Scenario::ALL
            .iter()
            .map(|&scenario| {
                let factor = scenario.factor();
                MonthlySummary {
                    scenario,
                    supply_amount: self.supply_growth.monthly_amount(self.initial_supply, factor),
                    supply_rate: self.supply_growth.monthly_rate(self.initial_supply, factor),
                    borrow_amount: self.borrow_growth.monthly_amount(self.initial_borrow, factor),
                    borrow_rate: self.borrow_growth.monthly_rate(self.initial_borrow, factor),
                }
            })
            .collect()
    }
}

/// Measures growth and extrapolates it for one year
///
/// `points` must be in ascending time order; the last point is the starting
/// value of every scenario.
///
/// # Errors
///
/// See [`MeasurementWindow::select`]. In compound mode, additionally returns
/// [`ProjectionError::ZeroBaseline`] when borrow was zero at the start of
/// the window. Linear mode clamps growth from a zero baseline to zero.
pub fn project(
    points: &[NormalizedPoint],
    mode: ProjectionMode,
) -> Result<GrowthProjection, ProjectionError> {
    let window = MeasurementWindow::select(points)?;

    if mode == ProjectionMode::Compound && window.first_borrow == 0.0 {
        return Err(ProjectionError::ZeroBaseline { field: "borrow" });
    }

    let (supply_growth, borrow_growth) = match mode {
        ProjectionMode::Linear => (
            linear::daily_growth(window.first_supply, window.last_supply, window.days),
            linear::daily_growth(window.first_borrow, window.last_borrow, window.days),
        ),
        ProjectionMode::Compound => (
            compound::monthly_growth(window.first_supply, window.last_supply, window.days),
            compound::monthly_growth(window.first_borrow, window.last_borrow, window.days),
        ),
    };

    debug!(
        mode = %mode,
        window_days = window.days,
        window_points = window.points,
        ?supply_growth,
        ?borrow_growth,
        "Measured market growth"
    );

    // Non-empty: the window check above guarantees points
    let last = points
        .last()
        .ok_or_else(|| ProjectionError::insufficient_data("history", MIN_HISTORY_POINTS, 0))?;

    let scenarios = Scenario::ALL
        .iter()
        .map(|&scenario| ScenarioProjection {
            scenario,
            points: (1..=PROJECTION_PERIODS)
                .map(|period| {
                    let days = f64::from(PERIOD_DAYS * period);
                    let timestamp = UnixTimestamp(
                        last.timestamp.0 + i64::from(PERIOD_DAYS * period) * SECONDS_PER_DAY,
                    );
                    ProjectedPoint::new(
                        timestamp,
                        supply_growth.project(last.total_supply, days, scenario.factor()),
                        borrow_growth.project(last.total_borrow, days, scenario.factor()),
                    )
                })
                .collect(),
        })
        .collect();

    let projection = GrowthProjection {
        mode,
        window,
        supply_growth,
        borrow_growth,
        initial_supply: last.total_supply,
        initial_borrow: last.total_borrow,
        start: last.timestamp,
        scenarios,
    };

    info!(
        mode = %mode,
        supply_annual_rate = projection.supply_annualized_rate(),
        borrow_annual_rate = projection.borrow_annualized_rate(),
        "Computed growth projection"
    );

    Ok(projection)
}
