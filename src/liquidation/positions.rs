// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Liquidation price distribution of exported positions
//!
//! Input is a JSON export of the form:
//!
//! ```json
//! {
//!   "positions": [
//!     {
//!       "position": "0x…",
//!       "userAddress": "0x…",
//!       "collateral": { "cbBTC": 0.5, "USD": 30000.0 },
//!       "borrowed": { "USD": 20000.0 },
//!       "liquidationPrice": 46511.6
//!     }
//!   ]
//! }
//! ```
//!
//! Entries that do not match this shape are logged and skipped.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::LiquidationError;

/// Quantiles outside of which liquidation prices are treated as outliers
pub const OUTLIER_QUANTILES: (f64, f64) = (0.01, 0.99);

/// Minimum rows left after outlier filtering for a histogram
pub const MIN_HISTOGRAM_ROWS: usize = 10;

/// Number of histogram edges (one more than the number of bins)
pub const HISTOGRAM_EDGES: usize = 30;

/// Lowest histogram edge unless the data starts higher
pub const HISTOGRAM_FLOOR: f64 = 35_000.0;

/// Highest histogram edge
pub const HISTOGRAM_CEILING: f64 = 100_000.0;

/// Half-open liquidation price ranges of the bucket summary
pub const PRICE_RANGES: [(f64, f64); 10] = [
    (35_000.0, 40_000.0),
    (40_000.0, 45_000.0),
    (45_000.0, 50_000.0),
    (50_000.0, 55_000.0),
    (55_000.0, 60_000.0),
    (60_000.0, 65_000.0),
    (65_000.0, 70_000.0),
    (70_000.0, 75_000.0),
    (75_000.0, 85_000.0),
    (85_000.0, 100_000.0),
];

#[derive(Debug, Deserialize)]
struct PositionsFile {
    positions: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionEntry {
    #[serde(default)]
    position: Option<String>,
    user_address: String,
    collateral: CollateralValue,
    borrowed: BorrowedValue,
    #[serde(default)]
    liquidation_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CollateralValue {
    #[serde(rename = "cbBTC")]
    btc: f64,
    #[serde(rename = "USD")]
    usd: f64,
}

#[derive(Debug, Deserialize)]
struct BorrowedValue {
    #[serde(rename = "USD")]
    usd: f64,
}

/// A position with collateral and a known liquidation price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidationRow {
    pub position_id: Option<String>,
    pub user_address: String,
    pub collateral_btc: f64,
    pub collateral_usd: f64,
    pub borrowed_usd: f64,
    pub liquidation_price: f64,
    /// Borrowed over collateral value in percent, `0` without collateral value
    pub current_ltv: f64,
}

impl LiquidationRow {
    fn from_entry(entry: PositionEntry) -> Option<Self> {
        let liquidation_price = entry.liquidation_price?;
        if entry.collateral.btc <= 0.0 {
            return None;
        }

        let current_ltv = if entry.collateral.usd > 0.0 {
            entry.borrowed.usd / entry.collateral.usd * 100.0
        } else {
            0.0
        };

        Some(Self {
            position_id: entry.position,
            user_address: entry.user_address,
            collateral_btc: entry.collateral.btc,
            collateral_usd: entry.collateral.usd,
            borrowed_usd: entry.borrowed.usd,
            liquidation_price,
            current_ltv,
        })
    }
}

/// Parses a positions export, keeping rows with collateral and a liquidation price
///
/// # Errors
///
/// Returns [`LiquidationError::Parse`] if the document has no `positions`
/// array. Individual malformed entries are skipped.
pub fn parse_positions(json: &str) -> Result<Vec<LiquidationRow>, LiquidationError> {
    let file: PositionsFile = serde_json::from_str(json)?;
    let total = file.positions.len();

    let rows: Vec<LiquidationRow> = file
        .positions
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<PositionEntry>(value) {
            Ok(entry) => LiquidationRow::from_entry(entry),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed position entry");
                None
            }
        })
        .collect();

    info!(
        loaded = total,
        with_liquidation_price = rows.len(),
        "Parsed positions export"
    );
    Ok(rows)
}

/// Reads and parses a positions export from disk
pub async fn load_positions(path: &Path) -> Result<Vec<LiquidationRow>, LiquidationError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LiquidationError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_positions(&json)
}

/// Quantile of ascending `sorted` values with linear interpolation
///
/// Matches the common "linear" definition: position `q * (n - 1)`
/// interpolated between its neighbours.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Rows whose liquidation price lies within the given quantiles, inclusive
pub fn filter_outliers(
    rows: &[LiquidationRow],
    lower_q: f64,
    upper_q: f64,
) -> Vec<LiquidationRow> {
    let mut prices: Vec<f64> = rows.iter().map(|r| r.liquidation_price).collect();
    prices.sort_by(f64::total_cmp);

    let (Some(lower), Some(upper)) = (quantile(&prices, lower_q), quantile(&prices, upper_q)) else {
        return Vec::new();
    };

    rows.iter()
        .filter(|r| r.liquidation_price >= lower && r.liquidation_price <= upper)
        .cloned()
        .collect()
}

/// Histogram over linearly spaced edges
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `bins + 1` ascending edges
    pub edges: Vec<f64>,
    /// Summed weight per bin
    pub weights: Vec<f64>,
}

impl Histogram {
    /// Builds a weighted histogram of `(value, weight)` pairs
    ///
    /// Bins are half-open except the last, which includes the upper edge.
    /// Values outside `[lower, upper]` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidationError::InvalidHistogram`] when `lower >= upper`
    /// or fewer than two edges are requested.
    pub fn weighted(
        samples: impl IntoIterator<Item = (f64, f64)>,
        lower: f64,
        upper: f64,
        edges: usize,
    ) -> Result<Self, LiquidationError> {
        if edges < 2 {
            return Err(LiquidationError::invalid_histogram(format!(
                "need at least 2 edges, got {edges}"
            )));
        }
        if lower.is_nan() || upper.is_nan() || lower >= upper {
            return Err(LiquidationError::invalid_histogram(format!(
                "lower edge {lower} is not below upper edge {upper}"
            )));
        }

        let bins = edges - 1;
        let width = (upper - lower) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { upper } else { lower + width * i as f64 })
            .collect();
        let mut weights = vec![0.0; bins];

        for (value, weight) in samples {
            if value < lower || value > upper {
                continue;
            }
            let index = if value == upper {
                bins - 1
            } else {
                (((value - lower) / width) as usize).min(bins - 1)
            };
            weights[index] += weight;
        }

        Ok(Self { edges, weights })
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// `(lower edge, upper edge, weight)` per bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.weights)
            .map(|(edge, weight)| (edge[0], edge[1], *weight))
    }

    /// Center of the heaviest bin
    pub fn peak_center(&self) -> Option<f64> {
        self.bins()
            .max_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(lo, hi, _)| (lo + hi) / 2.0)
    }
}

/// Positions and collateral within one price range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Share of all rows in percent
    pub share: f64,
    pub collateral_btc: f64,
}

/// Summary statistics of liquidation prices
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation, `None` for a single row
    pub std_dev: Option<f64>,
}

impl PriceStats {
    fn from_rows(rows: &[LiquidationRow]) -> Option<Self> {
        let mut prices: Vec<f64> = rows.iter().map(|r| r.liquidation_price).collect();
        prices.sort_by(f64::total_cmp);

        let n = prices.len() as f64;
        let mean = prices.iter().sum::<f64>() / n;
        let median = quantile(&prices, 0.5)?;
        let std_dev = (prices.len() > 1).then(|| {
            let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        });

        Some(Self {
            mean,
            median,
            std_dev,
        })
    }
}

/// Liquidation price distribution of a set of positions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidationReport {
    /// Rows with collateral and a liquidation price
    pub total_rows: usize,
    /// Rows left after outlier filtering
    pub filtered_rows: usize,
    /// Statistics over all rows
    pub stats: PriceStats,
    /// Bucket summary over all rows
    pub buckets: Vec<PriceBucket>,
    /// Collateral-weighted histogram of filtered rows, if there were enough
    pub histogram: Option<Histogram>,
    /// Reference BTC price, if supplied
    pub btc_price: Option<f64>,
    /// Rows whose liquidation price is at or above `btc_price`
    pub liquidatable_at_price: Option<usize>,
}

/// Builds the liquidation report for `rows`
///
/// # Errors
///
/// Returns [`LiquidationError::NoPositions`] when `rows` is empty.
pub fn analyze(
    rows: &[LiquidationRow],
    btc_price: Option<f64>,
) -> Result<LiquidationReport, LiquidationError> {
    let stats = PriceStats::from_rows(rows).ok_or(LiquidationError::NoPositions)?;

    let filtered = filter_outliers(rows, OUTLIER_QUANTILES.0, OUTLIER_QUANTILES.1);
    debug!(
        total = rows.len(),
        filtered = filtered.len(),
        "Filtered liquidation price outliers"
    );

    let histogram = if filtered.len() < MIN_HISTOGRAM_ROWS {
        warn!(
            rows = filtered.len(),
            required = MIN_HISTOGRAM_ROWS,
            "Not enough positions after filtering outliers, skipping histogram"
        );
        None
    } else {
        let lowest = filtered
            .iter()
            .map(|r| r.liquidation_price)
            .fold(f64::INFINITY, f64::min);
        let samples = filtered.iter().map(|r| (r.liquidation_price, r.collateral_btc));
        match Histogram::weighted(
            samples,
            lowest.max(HISTOGRAM_FLOOR),
            HISTOGRAM_CEILING,
            HISTOGRAM_EDGES,
        ) {
            Ok(histogram) => Some(histogram),
            Err(e) => {
                warn!(error = %e, "Skipping histogram");
                None
            }
        }
    };

    let buckets = PRICE_RANGES
        .iter()
        .map(|&(lower, upper)| {
            let in_range = rows
                .iter()
                .filter(|r| r.liquidation_price >= lower && r.liquidation_price < upper);
            let (count, collateral_btc) = in_range.fold((0usize, 0.0), |(count, sum), r| {
                (count + 1, sum + r.collateral_btc)
            });
            PriceBucket {
                lower,
                upper,
                count,
                share: count as f64 / rows.len() as f64 * 100.0,
                collateral_btc,
            }
        })
        .collect();

    let liquidatable_at_price =
        btc_price.map(|price| rows.iter().filter(|r| r.liquidation_price >= price).count());

    Ok(LiquidationReport {
        total_rows: rows.len(),
        filtered_rows: filtered.len(),
        stats,
        buckets,
        histogram,
        btc_price,
        liquidatable_at_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(price: f64, collateral: f64) -> LiquidationRow {
        LiquidationRow {
            position_id: None,
            user_address: "0xabc".to_string(),
            collateral_btc: collateral,
            collateral_usd: collateral * 90_000.0,
            borrowed_usd: price * collateral * 0.86,
            liquidation_price: price,
            current_ltv: 0.0,
        }
    }

    #[test]
    fn parses_and_filters_entries() {
        let json = r#"{
            "positions": [
                {
                    "position": "p1",
                    "userAddress": "0x1",
                    "collateral": { "cbBTC": 1.0, "USD": 100000.0 },
                    "borrowed": { "USD": 50000.0 },
                    "liquidationPrice": 58139.5
                },
                {
                    "position": "p2",
                    "userAddress": "0x2",
                    "collateral": { "cbBTC": 0.0, "USD": 0.0 },
                    "borrowed": { "USD": 0.0 },
                    "liquidationPrice": 1.0
                },
                {
                    "position": "p3",
                    "userAddress": "0x3",
                    "collateral": { "cbBTC": 2.0, "USD": 0.0 },
                    "borrowed": { "USD": 10.0 }
                },
                { "position": "p4" }
            ]
        }"#;

        let rows = parse_positions(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].position_id.as_deref(), Some("p1"));
        assert_eq!(rows[0].current_ltv, 50.0);
    }

    #[test]
    fn zero_collateral_value_gives_zero_ltv() {
        let json = r#"{"positions":[{"userAddress":"0x1","collateral":{"cbBTC":1.0,"USD":0.0},"borrowed":{"USD":5.0},"liquidationPrice":10.0}]}"#;
        let rows = parse_positions(json).unwrap();
        assert_eq!(rows[0].current_ltv, 0.0);
    }

    #[test]
    fn rejects_document_without_positions() {
        assert!(matches!(
            parse_positions(r#"{"items": []}"#),
            Err(LiquidationError::Parse(_))
        ));
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert!((quantile(&values, 0.01).unwrap() - 1.03).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn outlier_filter_drops_extremes() {
        let mut rows: Vec<_> = (1..=100).map(|i| row(50_000.0 + i as f64, 1.0)).collect();
        rows.push(row(1.0, 1.0));
        rows.push(row(1_000_000.0, 1.0));

        // Interpolated bounds also drop the lowest and highest regular rows
        let filtered = filter_outliers(&rows, 0.01, 0.99);
        assert_eq!(filtered.len(), 98);
        assert!(filtered.iter().all(|r| r.liquidation_price > 50_000.0));
        assert!(filtered.iter().all(|r| r.liquidation_price < 1_000_000.0));
    }

    #[test]
    fn histogram_includes_upper_edge_in_last_bin() {
        let histogram = Histogram::weighted(
            [(0.0, 1.0), (5.0, 2.0), (10.0, 4.0), (11.0, 8.0)],
            0.0,
            10.0,
            3,
        )
        .unwrap();

        assert_eq!(histogram.edges, vec![0.0, 5.0, 10.0]);
        assert_eq!(histogram.weights, vec![1.0, 6.0]);
        assert_eq!(histogram.peak_center(), Some(7.5));
    }

    #[test]
    fn histogram_rejects_inverted_bounds() {
        assert!(matches!(
            Histogram::weighted(std::iter::empty(), 10.0, 10.0, 30),
            Err(LiquidationError::InvalidHistogram { .. })
        ));
    }

    #[test]
    fn stats_use_sample_standard_deviation() {
        let rows = vec![row(2.0, 1.0), row(4.0, 1.0), row(6.0, 1.0)];
        let stats = PriceStats::from_rows(&rows).unwrap();
        assert_eq!(stats.mean, 4.0);
        assert_eq!(stats.median, 4.0);
        assert_eq!(stats.std_dev, Some(2.0));

        let single = PriceStats::from_rows(&rows[..1]).unwrap();
        assert_eq!(single.std_dev, None);
    }

    #[test]
    fn report_buckets_and_histogram() {
        let rows: Vec<_> = (0..20)
            .map(|i| row(40_000.0 + 1_000.0 * i as f64, 0.5))
            .collect();

        let report = analyze(&rows, Some(55_000.0)).unwrap();
        assert_eq!(report.total_rows, 20);

        // 40k..=44k in [40k, 45k)
        let bucket = report.buckets[1];
        assert_eq!(bucket.count, 5);
        assert_eq!(bucket.share, 25.0);
        assert_eq!(bucket.collateral_btc, 2.5);

        let histogram = report.histogram.unwrap();
        assert_eq!(histogram.len(), HISTOGRAM_EDGES - 1);
        assert_eq!(histogram.edges[HISTOGRAM_EDGES - 1], HISTOGRAM_CEILING);

        // 55k..=59k
        assert_eq!(report.liquidatable_at_price, Some(5));
    }

    #[test]
    fn report_skips_histogram_for_few_rows() {
        let rows: Vec<_> = (0..5).map(|i| row(60_000.0 + i as f64, 1.0)).collect();
        let report = analyze(&rows, None).unwrap();
        assert!(report.histogram.is_none());
        assert_eq!(report.liquidatable_at_price, None);
    }

    #[test]
    fn empty_rows_are_an_error() {
        assert!(matches!(analyze(&[], None), Err(LiquidationError::NoPositions)));
    }
}
