// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Morpho Blue market analytics
//!
//! Samples a lending market's on-chain state at fixed block intervals, caches
//! the sampled history on disk, projects supply and borrow growth, and
//! analyzes borrower liquidation prices.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use morphoscan::cache::DiskCache;
//! use morphoscan::provider::create_base_provider;
//! use morphoscan::{CollectOptions, HistoryCollector, MorphoReader, TrackerConfig};
//!
//! let config = TrackerConfig::default();
//! let reader = MorphoReader::new(create_base_provider()?, config.morpho_address, config.market_id);
//! let cache = DiskCache::new(&config.cache_path).validate()?;
//!
//! let history = HistoryCollector::new(reader, Box::new(cache))
//!     .with_sampler(config.sampler()?)
//!     .collect(config.block_range()?, CollectOptions::default())
//!     .await?;
//! ```

pub mod api;
pub mod blocks;
pub mod bootstrap;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod history;
pub mod liquidation;
pub mod market;
pub mod projection;
pub mod provider;
pub mod report;
mod tracing;

pub use api::{MarketCreation, MorphoApiClient};
pub use blocks::{BlockRange, BlockSampler};
pub use config::{TrackerConfig, TrackerConfigBuilder};
pub use errors::{
    ApiError, BlockRangeError, CacheError, ExportError, HistoryError, LiquidationError,
    MorphoscanError, ProjectionError, RpcError,
};
pub use history::{CollectOptions, HistoryCollector, MarketHistory, NormalizedPoint};
pub use market::{
    fetch_sample, utilization_rate, MarketId, MarketReader, MarketState, MorphoReader,
    SampleRecord, TokenDecimals, UnixTimestamp,
};
pub use projection::{project, GrowthProjection, ProjectionMode, Scenario};
pub use provider::ProviderError;
