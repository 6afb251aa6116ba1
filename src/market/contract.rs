// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Contract bindings for Morpho Blue and ERC-20 metadata
//!
//! Only the view functions the tracker reads are declared.

use alloy_sol_types::sol;

sol! {
    /// Morpho Blue singleton (read-only subset)
    #[sol(rpc)]
    interface IMorpho {
        /// Aggregate market totals
        ///
        /// All amounts are raw loan-token units; `fee` is a WAD fraction.
        function market(bytes32 id) external view returns (
            uint128 totalSupplyAssets,
            uint128 totalSupplyShares,
            uint128 totalBorrowAssets,
            uint128 totalBorrowShares,
            uint128 lastUpdate,
            uint128 fee
        );

        /// Position of `user` in market `id`
        function position(bytes32 id, address user) external view returns (
            uint256 supplyShares,
            uint128 borrowShares,
            uint128 collateral
        );

        /// Immutable parameters of market `id`
        ///
        /// `lltv` is a WAD fraction (e.g. `0.86e18`).
        function idToMarketParams(bytes32 id) external view returns (
            address loanToken,
            address collateralToken,
            address oracle,
            address irm,
            uint256 lltv
        );
    }
}

sol! {
    /// ERC-20 metadata extension
    #[sol(rpc)]
    interface IERC20Metadata {
        function decimals() external view returns (uint8);
    }
}
