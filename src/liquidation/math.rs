// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Morpho share accounting and liquidation price arithmetic

use alloy_primitives::U256;

use crate::config::constants::morpho::{VIRTUAL_ASSETS, VIRTUAL_SHARES, WAD};

/// `ceil(x * y / d)`, or `None` on overflow or a zero divisor
pub fn mul_div_up(x: U256, y: U256, d: U256) -> Option<U256> {
    if d.is_zero() {
        return None;
    }
    x.checked_mul(y)?.checked_add(d - U256::from(1))?.checked_div(d)
}

/// Converts shares to assets, rounding up
///
/// Virtual shares and assets are added to the totals the same way Morpho Blue
/// does, so an empty market still has a well-defined share price.
pub fn to_assets_up(shares: u128, total_assets: u128, total_shares: u128) -> U256 {
    let total_assets = U256::from(total_assets) + U256::from(VIRTUAL_ASSETS);
    let total_shares = U256::from(total_shares) + U256::from(VIRTUAL_SHARES);

    // Two u128 factors plus a u129 addend stay below 2^256
    mul_div_up(U256::from(shares), total_assets, total_shares).unwrap_or(U256::MAX)
}

/// LLTV stored as an 18-decimal WAD, as a fraction (`0.86e18` becomes `0.86`)
pub fn lltv_to_fraction(lltv: U256) -> f64 {
    lltv.saturating_to::<u128>() as f64 / WAD as f64
}

/// Collateral price at which a position becomes liquidatable
///
/// `borrowed` is in loan-token units, `collateral` in collateral-token
/// units. Returns `None` when the position has no collateral or the market
/// has a zero LLTV.
pub fn liquidation_price(borrowed: f64, collateral: f64, lltv: f64) -> Option<f64> {
    let denominator = collateral * lltv;
    if denominator > 0.0 {
        Some(borrowed / denominator)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_up_rounds_up() {
        let up = mul_div_up(U256::from(10), U256::from(10), U256::from(3));
        assert_eq!(up, Some(U256::from(34)));

        let exact = mul_div_up(U256::from(10), U256::from(9), U256::from(3));
        assert_eq!(exact, Some(U256::from(30)));
    }

    #[test]
    fn mul_div_up_rejects_zero_divisor() {
        assert_eq!(mul_div_up(U256::from(1), U256::from(1), U256::ZERO), None);
    }

    #[test]
    fn mul_div_up_detects_overflow() {
        assert_eq!(mul_div_up(U256::MAX, U256::from(2), U256::from(1)), None);
    }

    #[test]
    fn to_assets_up_applies_virtual_offsets() {
        // Empty market: one asset per million shares, rounded up
        assert_eq!(to_assets_up(1_000_000, 0, 0), U256::from(1));
        assert_eq!(to_assets_up(1, 0, 0), U256::from(1));
        assert_eq!(to_assets_up(0, 0, 0), U256::ZERO);

        // 2,001 assets over 2.001e9 shares once the virtual offsets are added
        let assets = to_assets_up(1_000_000_000, 2_000, 2_000_000_000);
        assert_eq!(assets, U256::from(1_000));
    }

    #[test]
    fn to_assets_up_handles_max_inputs() {
        let assets = to_assets_up(u128::MAX, u128::MAX, 0);
        assert!(assets > U256::from(u128::MAX));
    }

    #[test]
    fn lltv_fraction() {
        let lltv = U256::from(860_000_000_000_000_000u128);
        assert!((lltv_to_fraction(lltv) - 0.86).abs() < 1e-12);
        assert_eq!(lltv_to_fraction(U256::ZERO), 0.0);
    }

    #[test]
    fn liquidation_price_formula() {
        let price = liquidation_price(43_000.0, 1.0, 0.86).unwrap();
        assert!((price - 50_000.0).abs() < 1e-6);
        assert_eq!(liquidation_price(100.0, 0.0, 0.86), None);
        assert_eq!(liquidation_price(100.0, 1.0, 0.0), None);
    }
}
