// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for morphoscan integration tests
//!
//! Provides mock implementations of traits to enable testing without
//! real blockchain connections.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use alloy_primitives::BlockNumber;
use async_trait::async_trait;
use morphoscan::{MarketReader, MarketState, RpcError, UnixTimestamp};

/// First timestamp handed out by [`MockMarketReader::with_linear_market`]
pub const GENESIS_TIMESTAMP: i64 = 1_725_148_800;

/// In-memory MarketReader
///
/// Serves states registered per block and counts every call so tests can
/// assert whether the chain was touched.
///
/// # Example
///
/// ```rust,ignore
/// let reader = MockMarketReader::new(1_000)
///     .with_linear_market(&[100, 200, 300])
///     .failing_at(200);
///
/// let collector = HistoryCollector::new(reader, Box::new(NoOpCache));
/// ```
pub struct MockMarketReader {
    latest_block: BlockNumber,
    states: HashMap<BlockNumber, MarketState>,
    timestamps: HashMap<BlockNumber, UnixTimestamp>,
    failing: HashSet<BlockNumber>,
    state_calls: AtomicUsize,
    latest_calls: AtomicUsize,
}

impl MockMarketReader {
    /// Create a reader whose chain tip is `latest_block` and which knows no blocks
    pub fn new(latest_block: BlockNumber) -> Self {
        Self {
            latest_block,
            states: HashMap::new(),
            timestamps: HashMap::new(),
            failing: HashSet::new(),
            state_calls: AtomicUsize::new(0),
            latest_calls: AtomicUsize::new(0),
        }
    }

    /// Register the state and timestamp served for `block`
    pub fn with_block(
        mut self,
        block: BlockNumber,
        timestamp: UnixTimestamp,
        state: MarketState,
    ) -> Self {
        self.states.insert(block, state);
        self.timestamps.insert(block, timestamp);
        self
    }

    /// Register a steadily growing market at each of `blocks`
    ///
    /// The i-th block holds `1_000 + 100 * i` USDC supplied and half of that
    /// borrowed, one day after the previous block.
    pub fn with_linear_market(self, blocks: &[BlockNumber]) -> Self {
        blocks.iter().enumerate().fold(self, |reader, (i, &block)| {
            let supply = (1_000 + 100 * i as u128) * 1_000_000;
            reader.with_block(
                block,
                UnixTimestamp(GENESIS_TIMESTAMP + i as i64 * 86_400),
                market_state(supply, supply / 2),
            )
        })
    }

    /// Make every read at `block` fail
    pub fn failing_at(mut self, block: BlockNumber) -> Self {
        self.failing.insert(block);
        self
    }

    /// Number of `market_state` calls so far
    pub fn state_calls(&self) -> usize {
        self.state_calls.load(Ordering::SeqCst)
    }

    /// Number of `latest_block` calls so far
    pub fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketReader for MockMarketReader {
    async fn latest_block(&self) -> Result<BlockNumber, RpcError> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.latest_block)
    }

    async fn market_state(&self, block: BlockNumber) -> Result<MarketState, RpcError> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&block) {
            return Err(RpcError::BlockNotFound {
                block_number: block,
            });
        }
        self.states
            .get(&block)
            .copied()
            .ok_or(RpcError::BlockNotFound {
                block_number: block,
            })
    }

    async fn block_timestamp(&self, block: BlockNumber) -> Result<UnixTimestamp, RpcError> {
        self.timestamps
            .get(&block)
            .copied()
            .ok_or(RpcError::BlockNotFound {
                block_number: block,
            })
    }
}

/// Helper to create a MarketState with shares mirroring assets
pub fn market_state(supply: u128, borrow: u128) -> MarketState {
    MarketState {
        total_supply_assets: supply,
        total_supply_shares: supply * 1_000_000,
        total_borrow_assets: borrow,
        total_borrow_shares: borrow * 1_000_000,
        last_update: GENESIS_TIMESTAMP as u128,
        fee: 0,
    }
}
