// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the Morpho GraphQL API client.

/// Errors returned by [`MorphoApiClient`](crate::MorphoApiClient).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request failed or returned a non-success status.
    #[error("Morpho API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API URL could not be parsed.
    #[error("Invalid Morpho API URL {url}: {source}")]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// The parse error
        #[source]
        source: url::ParseError,
    },

    /// The GraphQL response carried an `errors` array.
    #[error("Morpho API returned errors: {messages}")]
    GraphQl {
        /// Error messages joined with "; "
        messages: String,
    },

    /// The response contained no market for the requested key.
    #[error("Market {unique_key} not found on chain {chain_id}")]
    MarketNotFound {
        /// Market unique key that was queried
        unique_key: String,
        /// Chain id that was queried
        chain_id: u64,
    },

    /// The response body did not match the expected shape.
    #[error("Unexpected Morpho API response: {0}")]
    Decode(#[from] serde_json::Error),
}
