// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Morpho Blue market access.
//!
//! This module provides:
//! - Contract bindings for the Morpho Blue views the tracker reads
//! - Strong types for market ids, market state and sampled records
//! - The [`MarketReader`] trait and its provider-backed implementation

pub mod amount;
pub mod contract;
pub mod reader;
pub mod types;

// Re-export public API
pub use amount::TokenDecimals;
pub use reader::{fetch_sample, MarketReader, MorphoReader};
pub use types::{
    utilization_rate, MarketId, MarketParams, MarketState, Position, SampleRecord, UnixTimestamp,
};
