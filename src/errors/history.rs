// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for market history collection.

use super::{BlockRangeError, RpcError};

/// Errors that abort a history collection run.
///
/// Per-sample RPC failures are not represented here: they are logged and the
/// sample is dropped. Only problems that make the whole run meaningless
/// propagate.
///
/// # Examples
///
/// ```rust,ignore
/// use morphoscan::{HistoryCollector, HistoryError};
///
/// match collector.collect(range, options).await {
///     Ok(history) => println!("{} samples", history.len()),
///     Err(HistoryError::Rpc(e)) => eprintln!("node unreachable: {e}"),
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The requested block range or sampling step is invalid.
    #[error("Invalid sampling request: {0}")]
    Range(#[from] BlockRangeError),

    /// RPC error that prevents collection from starting.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// The requested end block has not been produced yet.
    #[error("End block {end_block} is beyond the chain tip {latest_block}")]
    BeyondChainTip {
        /// Requested last block
        end_block: u64,
        /// Latest block reported by the node
        latest_block: u64,
    },
}
