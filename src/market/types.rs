// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Market identifiers, on-chain market state, and sampled records
//!
//! Raw amounts are kept as the `uint128` integers Morpho stores on-chain and
//! serialized as decimal strings so that cache files and exports never lose
//! precision in JSON number handling.

use alloy_primitives::{Address, BlockNumber, B256, U256};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key of a Morpho Blue market (`bytes32`)
///
/// # Examples
///
/// ```
/// use morphoscan::MarketId;
/// use morphoscan::config::constants::morpho::CBBTC_USDC_MARKET_ID;
///
/// let id = MarketId::new(CBBTC_USDC_MARKET_ID);
/// assert!(id.to_string().starts_with("0x9103c3b4"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketId(B256);

impl MarketId {
    /// Wraps a raw `bytes32` market key
    pub const fn new(id: B256) -> Self {
        Self(id)
    }

    /// The raw `bytes32` key
    pub const fn as_b256(&self) -> B256 {
        self.0
    }
}

impl From<B256> for MarketId {
    fn from(id: B256) -> Self {
        Self(id)
    }
}

impl From<MarketId> for B256 {
    fn from(id: MarketId) -> Self {
        id.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix timestamp in seconds (always UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixTimestamp(pub i64);

impl UnixTimestamp {
    /// Creates a UnixTimestamp from a u64 value
    pub fn from_u64(ts: u64) -> Self {
        Self(ts as i64)
    }

    /// Converts to u64 for use with blockchain timestamps
    pub fn as_u64(&self) -> u64 {
        self.0 as u64
    }

    /// UTC date-time, `None` if out of chrono's range
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    /// UTC calendar date
    pub fn date(&self) -> Option<NaiveDate> {
        self.to_datetime().map(|dt| dt.date_naive())
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Borrow as a percentage of supply
///
/// Defined as `0` when nothing is supplied rather than dividing by zero, so a
/// freshly created market reports 0% utilization even if the value is not a
/// meaningful rate.
///
/// # Examples
///
/// ```
/// use morphoscan::utilization_rate;
///
/// assert_eq!(utilization_rate(1_000, 250), 25.0);
/// assert_eq!(utilization_rate(0, 500), 0.0);
/// ```
pub fn utilization_rate(total_supply: u128, total_borrow: u128) -> f64 {
    if total_supply == 0 {
        return 0.0;
    }
    (total_borrow as f64 / total_supply as f64) * 100.0
}

/// Aggregate state of a market as returned by `Morpho.market(id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarketState {
    pub total_supply_assets: u128,
    pub total_supply_shares: u128,
    pub total_borrow_assets: u128,
    pub total_borrow_shares: u128,
    /// Timestamp of the last interest accrual
    pub last_update: u128,
    /// Protocol fee (WAD)
    pub fee: u128,
}

impl MarketState {
    /// Borrow as a percentage of supply, see [`utilization_rate`]
    pub fn utilization_rate(&self) -> f64 {
        utilization_rate(self.total_supply_assets, self.total_borrow_assets)
    }
}

/// One sampled point of market history
///
/// Created once per sampled block and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub block_number: BlockNumber,
    pub timestamp: UnixTimestamp,
    #[serde(with = "u128_string")]
    pub total_supply_assets: u128,
    #[serde(with = "u128_string")]
    pub total_supply_shares: u128,
    #[serde(with = "u128_string")]
    pub total_borrow_assets: u128,
    #[serde(with = "u128_string")]
    pub total_borrow_shares: u128,
    #[serde(with = "u128_string")]
    pub last_update: u128,
    #[serde(with = "u128_string")]
    pub fee: u128,
    /// Percentage, `0` when supply is zero
    pub utilization_rate: f64,
}

impl SampleRecord {
    /// Builds a record from a market state read at `block_number`
    pub fn new(block_number: BlockNumber, timestamp: UnixTimestamp, state: MarketState) -> Self {
        Self {
            block_number,
            timestamp,
            total_supply_assets: state.total_supply_assets,
            total_supply_shares: state.total_supply_shares,
            total_borrow_assets: state.total_borrow_assets,
            total_borrow_shares: state.total_borrow_shares,
            last_update: state.last_update,
            fee: state.fee,
            utilization_rate: state.utilization_rate(),
        }
    }

    /// The market state this record was built from
    pub fn state(&self) -> MarketState {
        MarketState {
            total_supply_assets: self.total_supply_assets,
            total_supply_shares: self.total_supply_shares,
            total_borrow_assets: self.total_borrow_assets,
            total_borrow_shares: self.total_borrow_shares,
            last_update: self.last_update,
            fee: self.fee,
        }
    }
}

/// A user's position in one market, as returned by `Morpho.position(id, user)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub supply_shares: U256,
    pub borrow_shares: u128,
    /// Raw collateral-token units
    pub collateral: u128,
}

/// Immutable market parameters, as returned by `Morpho.idToMarketParams(id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketParams {
    pub loan_token: Address,
    pub collateral_token: Address,
    pub oracle: Address,
    pub irm: Address,
    /// Liquidation loan-to-value (WAD)
    pub lltv: U256,
}

/// Serde adapter storing `u128` as a decimal string
pub(crate) mod u128_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
