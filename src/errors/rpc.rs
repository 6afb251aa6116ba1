// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Shared RPC error types for blockchain provider operations.
//!
//! These errors are produced by [`MarketReader`](crate::MarketReader)
//! implementations and carry enough context (operation, block height) to
//! explain which read failed.

/// Errors that can occur during blockchain RPC operations.
///
/// # Examples
///
/// ```rust
/// use morphoscan::RpcError;
///
/// let error = RpcError::BlockNotFound { block_number: 19_326_981 };
/// assert_eq!(error.to_string(), "Block not found: 19326981");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// A contract view call failed.
    ///
    /// Covers reverts (e.g. the contract did not exist yet at that height),
    /// ABI decode failures and transport errors surfaced by `alloy-contract`.
    #[error("Contract call {operation} failed at block {block_number}")]
    ContractCallFailed {
        /// Name of the view function that was called
        operation: String,
        /// Block height the call was pinned to
        block_number: u64,
        /// The underlying contract error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Block was not found at the specified block number.
    ///
    /// This can occur if the block number is beyond the chain tip or the
    /// provider has pruned it.
    #[error("Block not found: {block_number}")]
    BlockNotFound {
        /// The block number that wasn't found
        block_number: u64,
    },

    /// Failed to fetch the current block number.
    ///
    /// This is the first call made by every command and therefore doubles as
    /// the connectivity check.
    #[error("Failed to get current block number")]
    GetBlockNumberFailed {
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to fetch block details by number.
    ///
    /// This is different from `BlockNotFound`: the RPC call itself failed.
    #[error("Failed to fetch block {block_number} details")]
    GetBlockFailed {
        /// The block number we tried to fetch
        block_number: u64,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RpcError {
    /// Helper to create a `ContractCallFailed` error from any error type.
    pub fn contract_call_failed(
        operation: impl Into<String>,
        block_number: u64,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::ContractCallFailed {
            operation: operation.into(),
            block_number,
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetBlockNumberFailed` error from any error type.
    pub fn get_block_number_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        RpcError::GetBlockNumberFailed {
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetBlockFailed` error from any error type.
    pub fn get_block_failed(
        block_number: u64,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetBlockFailed {
            block_number,
            source: Box::new(source),
        }
    }

    /// Block height associated with this error, if any.
    pub fn block_number(&self) -> Option<u64> {
        match self {
            RpcError::ContractCallFailed { block_number, .. }
            | RpcError::BlockNotFound { block_number }
            | RpcError::GetBlockFailed { block_number, .. } => Some(*block_number),
            RpcError::GetBlockNumberFailed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_number_is_reported_for_block_scoped_errors() {
        let io = std::io::Error::other("boom");
        let err = RpcError::contract_call_failed("market", 42, io);
        assert_eq!(err.block_number(), Some(42));
        assert!(err.to_string().contains("market"));

        let io = std::io::Error::other("boom");
        let err = RpcError::get_block_number_failed(io);
        assert_eq!(err.block_number(), None);
    }
}
