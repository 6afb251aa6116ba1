// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Historical reads of Morpho Blue market state
//!
//! [`MarketReader`] is the seam between history collection and the chain.
//! [`MorphoReader`] implements it over any alloy provider; tests substitute
//! an in-memory reader.
//!
//! # Examples
//!
//! ```rust,ignore
//! use morphoscan::{MorphoReader, TrackerConfig, fetch_sample};
//! use morphoscan::provider::create_base_provider;
//!
//! let config = TrackerConfig::default();
//! let provider = create_base_provider()?;
//! let reader = MorphoReader::new(provider, config.morpho_address, config.market_id);
//!
//! let record = fetch_sample(&reader, 20_000_000).await?;
//! println!("utilization at {}: {:.2}%", record.block_number, record.utilization_rate);
//! ```

use alloy_consensus::BlockHeader;
use alloy_eips::BlockId;
use alloy_network::{BlockResponse, Network};
use alloy_primitives::{Address, BlockNumber};
use alloy_provider::Provider;
use async_trait::async_trait;
use tracing::{debug, Instrument};

use crate::errors::RpcError;
use crate::market::contract::{IERC20Metadata, IMorpho};
use crate::market::types::{
    MarketId, MarketParams, MarketState, Position, SampleRecord, UnixTimestamp,
};
use crate::market::TokenDecimals;
use crate::tracing::spans;

/// Read access to one market's on-chain state at historical heights
#[async_trait]
pub trait MarketReader: Send + Sync {
    /// Current chain tip
    ///
    /// Doubles as the connectivity check before a run starts.
    async fn latest_block(&self) -> Result<BlockNumber, RpcError>;

    /// Market totals at `block`
    async fn market_state(&self, block: BlockNumber) -> Result<MarketState, RpcError>;

    /// Timestamp of `block`
    async fn block_timestamp(&self, block: BlockNumber) -> Result<UnixTimestamp, RpcError>;
}

/// Reads market state and block timestamp for one block
///
/// Both reads must succeed; there is no retry.
pub async fn fetch_sample<R>(reader: &R, block: BlockNumber) -> Result<SampleRecord, RpcError>
where
    R: MarketReader + ?Sized,
{
    async {
        let state = reader.market_state(block).await?;
        let timestamp = reader.block_timestamp(block).await?;

        let record = SampleRecord::new(block, timestamp, state);
        debug!(
            block,
            timestamp = %timestamp,
            utilization = record.utilization_rate,
            "Fetched market sample"
        );
        Ok::<_, RpcError>(record)
    }
    .instrument(spans::fetch_sample(block))
    .await
}

/// [`MarketReader`] backed by the Morpho Blue contract through an alloy provider
///
/// Generic over the network so the same reader works with Ethereum and
/// OP Stack providers (Base uses `op_alloy_network::Optimism`).
pub struct MorphoReader<P, N: Network> {
    morpho: IMorpho::IMorphoInstance<P, N>,
    market_id: MarketId,
}

impl<P, N> MorphoReader<P, N>
where
    P: Provider<N>,
    N: Network,
{
    /// Creates a reader for `market_id` on the Morpho deployment at `morpho_address`
    pub fn new(provider: P, morpho_address: Address, market_id: MarketId) -> Self {
        Self {
            morpho: IMorpho::IMorphoInstance::new(morpho_address, provider),
            market_id,
        }
    }

    /// Market this reader is bound to
    pub fn market_id(&self) -> MarketId {
        self.market_id
    }

    /// Underlying provider
    pub fn provider(&self) -> &P {
        self.morpho.provider()
    }

    /// Position of `user` at `block`
    pub async fn position(
        &self,
        user: Address,
        block: BlockNumber,
    ) -> Result<Position, RpcError> {
        let position = self
            .morpho
            .position(self.market_id.as_b256(), user)
            .block(BlockId::number(block))
            .call()
            .await
            .map_err(|e| RpcError::contract_call_failed("position", block, e))?;

        Ok(Position {
            supply_shares: position.supplyShares,
            borrow_shares: position.borrowShares,
            collateral: position.collateral,
        })
    }

    /// Immutable market parameters (read at `block`)
    pub async fn market_params(&self, block: BlockNumber) -> Result<MarketParams, RpcError> {
        let params = self
            .morpho
            .idToMarketParams(self.market_id.as_b256())
            .block(BlockId::number(block))
            .call()
            .await
            .map_err(|e| RpcError::contract_call_failed("idToMarketParams", block, e))?;

        Ok(MarketParams {
            loan_token: params.loanToken,
            collateral_token: params.collateralToken,
            oracle: params.oracle,
            irm: params.irm,
            lltv: params.lltv,
        })
    }

    /// ERC-20 decimals of `token`
    pub async fn token_decimals(
        &self,
        token: Address,
        block: BlockNumber,
    ) -> Result<TokenDecimals, RpcError> {
        let erc20 = IERC20Metadata::IERC20MetadataInstance::<_, N>::new(token, self.provider());
        let decimals = erc20
            .decimals()
            .block(BlockId::number(block))
            .call()
            .await
            .map_err(|e| RpcError::contract_call_failed("decimals", block, e))?;

        Ok(TokenDecimals::new(decimals))
    }
}

#[async_trait]
impl<P, N> MarketReader for MorphoReader<P, N>
where
    P: Provider<N> + Send + Sync,
    N: Network,
{
    async fn latest_block(&self) -> Result<BlockNumber, RpcError> {
        self.provider()
            .get_block_number()
            .await
            .map_err(RpcError::get_block_number_failed)
    }

    async fn market_state(&self, block: BlockNumber) -> Result<MarketState, RpcError> {
        async {
            let market = self
                .morpho
                .market(self.market_id.as_b256())
                .block(BlockId::number(block))
                .call()
                .await
                .map_err(|e| RpcError::contract_call_failed("market", block, e))?;

            Ok::<_, RpcError>(MarketState {
                total_supply_assets: market.totalSupplyAssets,
                total_supply_shares: market.totalSupplyShares,
                total_borrow_assets: market.totalBorrowAssets,
                total_borrow_shares: market.totalBorrowShares,
                last_update: market.lastUpdate,
                fee: market.fee,
            })
        }
        .instrument(spans::market_state(self.market_id, block))
        .await
    }

    async fn block_timestamp(&self, block: BlockNumber) -> Result<UnixTimestamp, RpcError> {
        async {
            let response = self
                .provider()
                .get_block_by_number(block.into())
                .await
                .map_err(|e| RpcError::get_block_failed(block, e))?
                .ok_or(RpcError::BlockNotFound {
                    block_number: block,
                })?;

            Ok::<_, RpcError>(UnixTimestamp::from_u64(response.header().timestamp()))
        }
        .instrument(spans::get_block_timestamp(block))
        .await
    }
}
