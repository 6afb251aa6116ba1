// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definitions
//!
//! Running `morphoscan` without a subcommand is the same as
//! `morphoscan history`.

use std::path::PathBuf;

use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::config::constants::sampling::DEFAULT_END_BLOCK;
use crate::projection::ProjectionMode;

/// Morpho Blue market analytics
#[derive(Debug, Parser)]
#[command(name = "morphoscan", version, about, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options of the default `history` command
    #[command(flatten)]
    pub history: HistoryArgs,

    /// Morpho GraphQL API endpoint
    #[arg(long, env = "MORPHO_API_URL", global = true)]
    pub api_url: Option<String>,
}

impl Cli {
    /// The subcommand to run, defaulting to `history`
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::History(self.history))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sample market history, project growth and export CSV/JSON
    History(HistoryArgs),

    /// Print the raw market state at one block
    Snapshot {
        /// Block to read
        #[arg(long, default_value_t = DEFAULT_END_BLOCK)]
        block: u64,
    },

    /// Look up the market's creation block through the Morpho API
    CreationBlock,

    /// Compute one borrower's liquidation price on-chain
    LiquidationPrice {
        /// Borrower address
        #[arg(long)]
        user: Address,

        /// Block to read (defaults to the chain tip)
        #[arg(long)]
        block: Option<u64>,
    },

    /// Analyze the liquidation price distribution of a positions export
    Liquidations {
        /// JSON file with a `positions` array
        #[arg(long)]
        positions: PathBuf,

        /// Reference BTC price in USD
        #[arg(long)]
        btc_price: Option<f64>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct HistoryArgs {
    /// Ignore cached data and fetch every sample again
    #[arg(long)]
    pub force_refresh: bool,

    /// Neither read nor write the cache file
    #[arg(long)]
    pub no_cache: bool,

    /// Growth model for projections
    #[arg(long, value_enum, default_value_t = ProjectionMode::Linear)]
    pub mode: ProjectionMode,

    /// First block of the range
    #[arg(long, conflicts_with = "from_creation")]
    pub start_block: Option<u64>,

    /// Last block of the range
    #[arg(long)]
    pub end_block: Option<u64>,

    /// Start at the market's creation block reported by the Morpho API
    #[arg(long)]
    pub from_creation: bool,

    /// Blocks between samples
    #[arg(long)]
    pub step: Option<u64>,

    /// Pause between samples in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Cache file location
    #[arg(long)]
    pub cache_path: Option<PathBuf>,

    /// Directory for CSV and JSON exports
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}
