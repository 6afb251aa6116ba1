// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CSV and JSON exports of a tracking run
//!
//! The CSV holds one row per historical sample followed, when a projection
//! was computed, by one row per projected point of every scenario. Projected
//! rows have `is_projection = true` and no block number or raw amounts.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::errors::ExportError;
use crate::history::MarketHistory;
use crate::market::{TokenDecimals, UnixTimestamp};
use crate::projection::{
    GrowthProjection, MeasurementWindow, MonthlySummary, ProjectionMode, Scenario,
    ScenarioProjection, SeriesGrowth,
};

/// One CSV line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub block_number: Option<u64>,
    pub timestamp: i64,
    /// `YYYY-MM-DD` (UTC)
    pub date: String,
    /// Raw loan-token units, historical rows only
    pub total_supply_assets: Option<String>,
    /// Raw loan-token units, historical rows only
    pub total_borrow_assets: Option<String>,
    pub total_supply: f64,
    pub total_borrow: f64,
    pub available_liquidity: f64,
    pub utilization_rate: f64,
    pub is_projection: bool,
    pub scenario: Option<Scenario>,
}

fn format_date(timestamp: UnixTimestamp) -> String {
    timestamp
        .date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Builds CSV rows for the history and an optional projection
pub fn export_rows(
    history: &MarketHistory,
    decimals: TokenDecimals,
    projection: Option<&GrowthProjection>,
) -> Vec<ExportRow> {
    let historical = history.records().iter().map(|record| {
        let total_supply = decimals.normalize(record.total_supply_assets);
        let total_borrow = decimals.normalize(record.total_borrow_assets);
        ExportRow {
            block_number: Some(record.block_number),
            timestamp: record.timestamp.0,
            date: format_date(record.timestamp),
            total_supply_assets: Some(record.total_supply_assets.to_string()),
            total_borrow_assets: Some(record.total_borrow_assets.to_string()),
            total_supply,
            total_borrow,
            available_liquidity: total_supply - total_borrow,
            utilization_rate: record.utilization_rate,
            is_projection: false,
            scenario: None,
        }
    });

    let projected = projection
        .into_iter()
        .flat_map(|p| p.scenarios.iter())
        .flat_map(|scenario| {
            scenario.points.iter().map(move |point| ExportRow {
                block_number: None,
                timestamp: point.timestamp.0,
                date: format_date(point.timestamp),
                total_supply_assets: None,
                total_borrow_assets: None,
                total_supply: point.total_supply,
                total_borrow: point.total_borrow,
                available_liquidity: point.available_liquidity,
                utilization_rate: point.utilization_rate,
                is_projection: true,
                scenario: Some(scenario.scenario),
            })
        });

    historical.chain(projected).collect()
}

fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| ExportError::io(parent.display().to_string(), e))?;
        }
    }
    Ok(())
}

/// Writes the history CSV, creating the output directory if needed
///
/// Returns the number of rows written.
pub fn write_history_csv(
    path: &Path,
    history: &MarketHistory,
    decimals: TokenDecimals,
    projection: Option<&GrowthProjection>,
) -> Result<usize, ExportError> {
    ensure_parent(path)?;

    let rows = export_rows(history, decimals, projection);
    let mut writer = csv::Writer::from_path(path)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .map_err(|e| ExportError::io(path.display().to_string(), e))?;

    info!(path = %path.display(), rows = rows.len(), "Wrote market history CSV");
    Ok(rows.len())
}

/// Projection summary written next to the CSV
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionSummary<'a> {
    pub mode: ProjectionMode,
    pub window: &'a MeasurementWindow,
    pub supply_growth: &'a SeriesGrowth,
    pub borrow_growth: &'a SeriesGrowth,
    /// Percent per year
    pub supply_annualized_rate: f64,
    /// Percent per year
    pub borrow_annualized_rate: f64,
    pub initial_supply: f64,
    pub initial_borrow: f64,
    pub start: UnixTimestamp,
    pub monthly: Vec<MonthlySummary>,
    pub scenarios: &'a [ScenarioProjection],
}

impl<'a> From<&'a GrowthProjection> for ProjectionSummary<'a> {
    fn from(projection: &'a GrowthProjection) -> Self {
        Self {
            mode: projection.mode,
            window: &projection.window,
            supply_growth: &projection.supply_growth,
            borrow_growth: &projection.borrow_growth,
            supply_annualized_rate: projection.supply_annualized_rate(),
            borrow_annualized_rate: projection.borrow_annualized_rate(),
            initial_supply: projection.initial_supply,
            initial_borrow: projection.initial_borrow,
            start: projection.start,
            monthly: projection.monthly_summaries(),
            scenarios: &projection.scenarios,
        }
    }
}

/// Writes the projection summary as pretty-printed JSON
pub fn write_projection_json(path: &Path, projection: &GrowthProjection) -> Result<(), ExportError> {
    ensure_parent(path)?;

    let json = serde_json::to_vec_pretty(&ProjectionSummary::from(projection))?;
    fs::write(path, json).map_err(|e| ExportError::io(path.display().to_string(), e))?;

    info!(path = %path.display(), mode = %projection.mode, "Wrote projection summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockRange;
    use crate::market::{MarketState, SampleRecord};
    use crate::projection::project;
    use tempfile::TempDir;

    const DAY: i64 = 86_400;

    fn history(samples: i64) -> MarketHistory {
        let records = (0..samples)
            .map(|i| {
                SampleRecord::new(
                    i as u64 * 100,
                    UnixTimestamp(1_725_148_800 + i * 14 * DAY),
                    MarketState {
                        total_supply_assets: (100_000 + 1_400 * i as u128) * 1_000_000,
                        total_borrow_assets: (50_000 + 700 * i as u128) * 1_000_000,
                        ..MarketState::default()
                    },
                )
            })
            .collect();
        let range = BlockRange::new(0, (samples as u64 - 1) * 100).unwrap();
        MarketHistory::new(range, records, false)
    }

    #[test]
    fn historical_rows_only_without_projection() {
        let rows = export_rows(&history(3), TokenDecimals::USDC, None);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].block_number, Some(0));
        assert_eq!(rows[0].date, "2024-09-01");
        assert_eq!(rows[0].total_supply, 100_000.0);
        assert_eq!(rows[0].total_supply_assets.as_deref(), Some("100000000000"));
        assert!(rows.iter().all(|r| !r.is_projection));
    }

    #[test]
    fn projected_rows_follow_history() {
        let history = history(12);
        let points = history.points(TokenDecimals::USDC);
        let projection = project(&points, ProjectionMode::Linear).unwrap();

        let rows = export_rows(&history, TokenDecimals::USDC, Some(&projection));
        assert_eq!(rows.len(), 12 + 3 * 26);

        let first_projected = &rows[12];
        assert!(first_projected.is_projection);
        assert_eq!(first_projected.block_number, None);
        assert_eq!(first_projected.total_supply_assets, None);
        assert_eq!(first_projected.scenario, Some(Scenario::Bullish));
        assert_eq!(rows.last().unwrap().scenario, Some(Scenario::Bearish));
    }

    #[test]
    fn csv_has_header_and_empty_projected_block() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("history.csv");
        let history = history(12);
        let projection = project(&history.points(TokenDecimals::USDC), ProjectionMode::Compound).unwrap();

        let written =
            write_history_csv(&path, &history, TokenDecimals::USDC, Some(&projection)).unwrap();
        assert_eq!(written, 90);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "block_number,timestamp,date,total_supply_assets,total_borrow_assets,total_supply,\
             total_borrow,available_liquidity,utilization_rate,is_projection,scenario"
        );
        let projected = content.lines().nth(13).unwrap();
        assert!(projected.starts_with(','));
        assert!(projected.ends_with(",true,bullish"));
    }

    #[test]
    fn projection_json_contains_monthly_summary() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("projection.json");
        let history = history(12);
        let projection = project(&history.points(TokenDecimals::USDC), ProjectionMode::Linear).unwrap();

        write_projection_json(&path, &projection).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["mode"], "linear");
        assert_eq!(value["monthly"].as_array().unwrap().len(), 3);
        assert_eq!(value["supply_growth"]["model"], "linear");
        assert_eq!(value["scenarios"][0]["scenario"], "bullish");
    }
}
