// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Console tables printed by the command-line commands

use alloy_primitives::BlockNumber;

use crate::api::MarketCreation;
use crate::history::NormalizedPoint;
use crate::liquidation::{LiquidationReport, PositionLiquidation};
use crate::market::{MarketState, UnixTimestamp};
use crate::projection::{GrowthProjection, ProjectionMode, Scenario, SeriesGrowth};

/// Projected periods shown in the console (about 3, 6, 9 and 12 months out)
const QUARTERLY_PERIODS: [usize; 4] = [5, 12, 18, 25];

/// Formats with thousands separators and two decimals (`1234567.891` → `1,234,567.89`)
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

fn format_date(timestamp: UnixTimestamp) -> String {
    timestamp
        .date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Historical samples table
pub fn print_history(points: &[NormalizedPoint], loan_symbol: &str) {
    println!("\n=== Market Data at Sampled Blocks ===");
    println!(
        "{:>10}  {:<10}  {:>22}  {:>22}  {:>22}  {:>10}",
        "Block",
        "Date",
        format!("Total Supply ({loan_symbol})"),
        format!("Total Borrow ({loan_symbol})"),
        format!("Liquidity ({loan_symbol})"),
        "Util (%)"
    );
    for point in points {
        println!(
            "{:>10}  {:<10}  {:>22}  {:>22}  {:>22}  {:>9.2}%",
            point.block_number,
            format_date(point.timestamp),
            format_amount(point.total_supply),
            format_amount(point.total_borrow),
            format_amount(point.available_liquidity),
            point.utilization_rate
        );
    }
}

fn describe_growth(growth: &SeriesGrowth, loan_symbol: &str) -> String {
    match growth {
        SeriesGrowth::Linear { daily_amount } => {
            format!("{} {loan_symbol}/day", format_amount(*daily_amount))
        }
        SeriesGrowth::Compound { monthly_rate } => format!("{:.2}%/month", monthly_rate * 100.0),
    }
}

/// Growth rates and quarterly projected values of every scenario
pub fn print_projection(projection: &GrowthProjection, loan_symbol: &str) {
    let model = match projection.mode {
        ProjectionMode::Linear => "Linear",
        ProjectionMode::Compound => "Compound",
    };

    println!(
        "\n=== Growth Measured Over {} Days ({} Points) ===",
        projection.window.days, projection.window.points
    );
    println!("Supply growth: {}", describe_growth(&projection.supply_growth, loan_symbol));
    println!("Borrow growth: {}", describe_growth(&projection.borrow_growth, loan_symbol));
    println!("Annualized supply growth: {:.2}%", projection.supply_annualized_rate());
    println!("Annualized borrow growth: {:.2}%", projection.borrow_annualized_rate());

    for scenario in &projection.scenarios {
        println!(
            "\n=== Projected Market Data (Next Year) - {model} Model, {} Scenario ===",
            scenario.scenario
        );
        println!(
            "{:<10}  {:>22}  {:>22}  {:>22}  {:>10}",
            "Date", "Total Supply", "Total Borrow", "Liquidity", "Util (%)"
        );
        for point in QUARTERLY_PERIODS.iter().filter_map(|&i| scenario.points.get(i)) {
            println!(
                "{:<10}  {:>22}  {:>22}  {:>22}  {:>9.2}%",
                format_date(point.timestamp),
                format_amount(point.total_supply),
                format_amount(point.total_borrow),
                format_amount(point.available_liquidity),
                point.utilization_rate
            );
        }
    }
}

/// Monthly growth per scenario
pub fn print_monthly_summary(projection: &GrowthProjection, loan_symbol: &str) {
    println!("\n=== Monthly Growth by Scenario ===");
    for summary in projection.monthly_summaries() {
        let label = match summary.scenario {
            Scenario::Bullish => "Bullish (100%)",
            Scenario::Neutral => "Neutral (50%)",
            Scenario::Bearish => "Bearish (10%)",
        };
        println!("{label}:");
        println!(
            "  Supply: {} {loan_symbol}/month ({:.2}%)",
            format_amount(summary.supply_amount),
            summary.supply_rate
        );
        println!(
            "  Borrow: {} {loan_symbol}/month ({:.2}%)",
            format_amount(summary.borrow_amount),
            summary.borrow_rate
        );
    }
}

/// Raw market totals at one block
pub fn print_snapshot(block: BlockNumber, state: &MarketState) {
    println!("\n=== Market Data at Block {block} ===");
    println!("Total Supply Assets: {}", state.total_supply_assets);
    println!("Total Supply Shares: {}", state.total_supply_shares);
    println!("Total Borrow Assets: {}", state.total_borrow_assets);
    println!("Total Borrow Shares: {}", state.total_borrow_shares);
    println!("Last Update: {}", state.last_update);
    println!("Fee: {}", state.fee);
    println!("Utilization Rate: {:.2}%", state.utilization_rate());
}

/// Market creation metadata
pub fn print_creation(creation: &MarketCreation) {
    let datetime = creation
        .creation_timestamp
        .to_datetime()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    println!("\n=== Market Creation ===");
    println!("Market ID: {}", creation.unique_key);
    println!("Collateral Asset: {}", creation.collateral_symbol.as_deref().unwrap_or("?"));
    println!("Loan Asset: {}", creation.loan_symbol.as_deref().unwrap_or("?"));
    println!("Creation Block Number: {}", creation.creation_block);
    println!("Creation Date: {datetime}");
}

/// One position's liquidation price
pub fn print_position_liquidation(result: &PositionLiquidation) {
    println!("\n=== Position of {} at Block {} ===", result.user, result.block_number);
    println!("Borrow shares: {}", result.borrow_shares);
    println!("Borrowed: {:.6}", result.borrowed);
    println!("Collateral: {:.8}", result.collateral);
    println!("LLTV: {:.4}", result.lltv);
    match result.liquidation_price {
        Some(price) => println!("Liquidation price: {}", format_amount(price)),
        None => println!("Liquidation price: n/a (no collateral)"),
    }
}

/// Liquidation price distribution
pub fn print_liquidations(report: &LiquidationReport) {
    println!("\nPositions with liquidation prices: {}", report.total_rows);
    println!("Positions after outlier filtering: {}", report.filtered_rows);

    if let Some(price) = report.btc_price {
        println!("Reference BTC price: ${}", format_amount(price));
        if let Some(count) = report.liquidatable_at_price {
            println!("Positions liquidatable at this price: {count}");
        }
    }

    if let Some(histogram) = &report.histogram {
        println!("\n=== Collateral-Weighted Liquidation Prices ===");
        for (lower, upper, weight) in histogram.bins() {
            println!(
                "${:>12} - ${:>12}: {:>12.4} BTC",
                format_amount(lower),
                format_amount(upper),
                weight
            );
        }
        if let Some(peak) = histogram.peak_center() {
            println!("Most concentrated liquidation price: ${}", format_amount(peak));
        }
    }

    println!("\nLiquidation Price Statistics:");
    println!("Average liquidation price: ${}", format_amount(report.stats.mean));
    println!("Median liquidation price: ${}", format_amount(report.stats.median));
    match report.stats.std_dev {
        Some(std_dev) => println!("Standard deviation: ${}", format_amount(std_dev)),
        None => println!("Standard deviation: n/a"),
    }

    println!("\nPositions by Liquidation Price Range:");
    for bucket in &report.buckets {
        println!(
            "${} - ${}: {} positions ({:.1}%) - Total collateral: {:.4} BTC",
            format_amount(bucket.lower),
            format_amount(bucket.upper),
            bucket.count,
            bucket.share,
            bucket.collateral_btc
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(-42_000.5), "-42,000.50");
        assert_eq!(format_amount(-0.001), "0.00");
    }
}
