// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Token decimals and raw-amount normalization

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::constants::tokens;

/// ERC-20 token decimal precision
///
/// Morpho stores every amount as a raw integer in the token's smallest unit.
/// Dividing by `10^decimals` yields the human-readable amount.
///
/// # Examples
///
/// ```
/// use morphoscan::TokenDecimals;
///
/// // 1,234.5 USDC
/// assert_eq!(TokenDecimals::USDC.normalize(1_234_500_000), 1_234.5);
///
/// // 0.5 cbBTC
/// assert_eq!(TokenDecimals::CBBTC.normalize(50_000_000), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDecimals(u8);

impl TokenDecimals {
    /// USDC decimals (6)
    pub const USDC: Self = Self(tokens::USDC_DECIMALS);

    /// cbBTC decimals (8)
    pub const CBBTC: Self = Self(tokens::CBBTC_DECIMALS);

    /// Create a new decimal precision value
    pub const fn new(decimals: u8) -> Self {
        Self(decimals)
    }

    /// Get the raw decimal count
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Exact decimal representation of a raw amount
    pub fn to_decimal(&self, raw: u128) -> BigDecimal {
        // Scientific notation keeps the division exact
        BigDecimal::from_str(&format!("{raw}e-{}", self.0)).unwrap_or_default()
    }

    /// Human-readable amount as `f64`
    ///
    /// Precision loss only affects digits far below what reports display.
    pub fn normalize(&self, raw: u128) -> f64 {
        self.to_decimal(raw).to_f64().unwrap_or(0.0)
    }
}

impl Default for TokenDecimals {
    fn default() -> Self {
        Self::USDC
    }
}

impl From<u8> for TokenDecimals {
    fn from(decimals: u8) -> Self {
        Self(decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero() {
        assert_eq!(TokenDecimals::USDC.normalize(0), 0.0);
    }

    #[test]
    fn to_decimal_is_exact() {
        let value = TokenDecimals::USDC.to_decimal(1_000_001);
        assert_eq!(value, BigDecimal::from_str("1.000001").unwrap());
    }

    #[test]
    fn normalize_large_supply() {
        // 250 million USDC
        let raw = 250_000_000u128 * 1_000_000;
        assert_eq!(TokenDecimals::USDC.normalize(raw), 250_000_000.0);
    }

    #[test]
    fn zero_decimals_is_identity() {
        assert_eq!(TokenDecimals::new(0).normalize(42), 42.0);
    }
}
