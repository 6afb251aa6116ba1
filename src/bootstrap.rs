// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line entry point: logging setup and command dispatch

use std::path::PathBuf;
use std::time::Duration;

use alloy_primitives::{Address, BlockNumber};
use alloy_provider::RootProvider;
use anyhow::Context;
use op_alloy_network::Optimism;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::MorphoApiClient;
use crate::cache::{DiskCache, NoOpCache, SampleCache};
use crate::cli::{Cli, Command, HistoryArgs};
use crate::config::constants::tokens::USDC_SYMBOL;
use crate::config::{TrackerConfig, TrackerConfigBuilder};
use crate::export;
use crate::history::{CollectOptions, HistoryCollector};
use crate::liquidation::{analyze, load_positions, position_liquidation};
use crate::market::{MarketReader, MorphoReader};
use crate::projection::project;
use crate::provider::create_base_provider;
use crate::report;

type BaseReader = MorphoReader<RootProvider<Optimism>, Optimism>;

/// Installs the global tracing subscriber
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Logs go to stderr so
/// that tables on stdout stay readable.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
}

/// Runs the parsed command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut builder = TrackerConfigBuilder::with_defaults();
    if let Some(url) = cli.api_url.clone() {
        builder = builder.api_url(url);
    }

    match cli.into_command() {
        Command::History(args) => run_history(builder, args).await,
        Command::Snapshot { block } => run_snapshot(&builder.build(), block).await,
        Command::CreationBlock => run_creation_block(&builder.build()).await,
        Command::LiquidationPrice { user, block } => {
            run_liquidation_price(&builder.build(), user, block).await
        }
        Command::Liquidations {
            positions,
            btc_price,
        } => run_liquidations(positions, btc_price).await,
    }
}

/// Creates the Base reader without touching the network
fn base_reader(config: &TrackerConfig) -> anyhow::Result<BaseReader> {
    let provider = create_base_provider().context("Failed to create Base provider")?;
    Ok(MorphoReader::new(provider, config.morpho_address, config.market_id))
}

/// Creates the Base reader and checks connectivity
async fn connect(config: &TrackerConfig) -> anyhow::Result<(BaseReader, BlockNumber)> {
    let reader = base_reader(config)?;

    let latest_block = reader
        .latest_block()
        .await
        .context("Failed to connect to Base network")?;
    info!(latest_block, "Connected to Base network");

    Ok((reader, latest_block))
}

fn apply_history_args(mut builder: TrackerConfigBuilder, args: &HistoryArgs) -> TrackerConfig {
    if let Some(block) = args.start_block {
        builder = builder.start_block(block);
    }
    if let Some(block) = args.end_block {
        builder = builder.end_block(block);
    }
    if let Some(step) = args.step {
        builder = builder.sample_step(step);
    }
    if let Some(ms) = args.delay_ms {
        builder = builder.sample_delay(Duration::from_millis(ms));
    }
    if let Some(path) = &args.cache_path {
        builder = builder.cache_path(path.clone());
    }
    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    builder.build()
}

async fn run_history(builder: TrackerConfigBuilder, args: HistoryArgs) -> anyhow::Result<()> {
    let mut config = apply_history_args(builder, &args);

    if args.from_creation {
        let client = MorphoApiClient::new(&config.api_url)?;
        let creation = client
            .market_creation(&config.market_id.to_string(), u64::from(config.chain))
            .await
            .context("Failed to look up market creation block")?;
        config.start_block = creation.creation_block;
    }

    let range = config.block_range()?;
    let sampler = config.sampler()?;
    // Connectivity is checked by the collector's chain-tip read on a miss
    let reader = base_reader(&config)?;

    let cache: Box<dyn SampleCache> = if args.no_cache {
        Box::new(NoOpCache)
    } else {
        Box::new(DiskCache::new(config.cache_path.clone()).validate()?)
    };
    let options = CollectOptions {
        use_cache: !args.no_cache,
        force_refresh: args.force_refresh,
    };

    info!(
        range = %range,
        step = sampler.step(),
        cache = cache.name(),
        force_refresh = options.force_refresh,
        "Collecting market history"
    );

    let collector = HistoryCollector::new(reader, cache)
        .with_sampler(sampler)
        .with_sample_delay(config.sample_delay);
    let history = collector
        .collect(range, options)
        .await
        .context("Failed to collect market history from Base")?;

    if history.is_empty() {
        warn!("No market data was collected");
        return Ok(());
    }

    let points = history.points(config.loan_decimals);
    let mode = args.mode;
    let projection = match project(&points, mode) {
        Ok(projection) => {
            report::print_projection(&projection, USDC_SYMBOL);
            Some(projection)
        }
        Err(e) => {
            warn!(mode = %mode, error = %e, "Skipping growth projections");
            None
        }
    };

    report::print_history(&points, USDC_SYMBOL);

    let csv_path = config.history_csv_path();
    export::write_history_csv(&csv_path, &history, config.loan_decimals, projection.as_ref())?;
    println!("\nData saved to {}", csv_path.display());

    if let Some(projection) = &projection {
        let json_path = config.projection_json_path();
        export::write_projection_json(&json_path, projection)?;
        println!("Projection summary saved to {}", json_path.display());
        report::print_monthly_summary(projection, USDC_SYMBOL);
    }

    Ok(())
}

async fn run_snapshot(config: &TrackerConfig, block: BlockNumber) -> anyhow::Result<()> {
    let (reader, _) = connect(config).await?;
    let state = reader
        .market_state(block)
        .await
        .with_context(|| format!("Failed to query market data at block {block}"))?;

    report::print_snapshot(block, &state);
    Ok(())
}

async fn run_creation_block(config: &TrackerConfig) -> anyhow::Result<()> {
    let client = MorphoApiClient::new(&config.api_url)?;
    let creation = client
        .market_creation(&config.market_id.to_string(), u64::from(config.chain))
        .await?;

    report::print_creation(&creation);
    Ok(())
}

async fn run_liquidation_price(
    config: &TrackerConfig,
    user: Address,
    block: Option<BlockNumber>,
) -> anyhow::Result<()> {
    let (reader, latest_block) = connect(config).await?;
    let block = block.unwrap_or(latest_block);

    let result = position_liquidation(&reader, user, block).await?;
    report::print_position_liquidation(&result);
    Ok(())
}

async fn run_liquidations(positions: PathBuf, btc_price: Option<f64>) -> anyhow::Result<()> {
    let rows = load_positions(&positions).await?;
    let report = analyze(&rows, btc_price)?;

    report::print_liquidations(&report);
    Ok(())
}
