// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Client for the Morpho Blue GraphQL API
//!
//! Only market metadata is read from the API. Market state always comes from
//! the chain.

use std::time::Duration;

use alloy_primitives::BlockNumber;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, Instrument};
use url::Url;

use crate::errors::ApiError;
use crate::market::UnixTimestamp;
use crate::tracing::spans;

const MARKET_CREATION_QUERY: &str = r#"
query MarketCreation($uniqueKey: String!, $chainId: Int!) {
  marketByUniqueKey(uniqueKey: $uniqueKey, chainId: $chainId) {
    id
    uniqueKey
    creationBlockNumber
    creationTimestamp
    collateralAsset { symbol }
    loanAsset { symbol }
  }
}
"#;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Creation metadata of a market
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketCreation {
    /// API-internal market id
    pub id: String,
    /// On-chain market id (hex)
    pub unique_key: String,
    pub creation_block: BlockNumber,
    pub creation_timestamp: UnixTimestamp,
    pub collateral_symbol: Option<String>,
    pub loan_symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<MarketData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketData {
    market_by_unique_key: Option<MarketNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketNode {
    id: String,
    unique_key: String,
    creation_block_number: u64,
    creation_timestamp: NumberOrString,
    collateral_asset: Option<AssetNode>,
    loan_asset: Option<AssetNode>,
}

#[derive(Debug, Deserialize)]
struct AssetNode {
    symbol: String,
}

/// The API encodes big integers either as JSON numbers or strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    String(String),
}

impl NumberOrString {
    fn as_i64(&self) -> Option<i64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::String(s) => s.parse().ok(),
        }
    }
}

/// Decodes a `marketByUniqueKey` response body
///
/// # Errors
///
/// - [`ApiError::GraphQl`] when the body carries an `errors` array
/// - [`ApiError::MarketNotFound`] when the market is `null`
/// - [`ApiError::Decode`] when the body has an unexpected shape
pub fn parse_market_creation(
    body: &str,
    unique_key: &str,
    chain_id: u64,
) -> Result<MarketCreation, ApiError> {
    let response: GraphQlResponse = serde_json::from_str(body)?;

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        let messages = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ApiError::GraphQl { messages });
    }

    let not_found = || ApiError::MarketNotFound {
        unique_key: unique_key.to_string(),
        chain_id,
    };

    let market = response
        .data
        .and_then(|d| d.market_by_unique_key)
        .ok_or_else(not_found)?;

    let creation_timestamp = market
        .creation_timestamp
        .as_i64()
        .map(UnixTimestamp)
        .ok_or_else(|| ApiError::GraphQl {
            messages: format!(
                "creationTimestamp of market {} is not an integer",
                market.unique_key
            ),
        })?;

    Ok(MarketCreation {
        id: market.id,
        unique_key: market.unique_key,
        creation_block: market.creation_block_number,
        creation_timestamp,
        collateral_symbol: market.collateral_asset.map(|a| a.symbol),
        loan_symbol: market.loan_asset.map(|a| a.symbol),
    })
}

/// HTTP client for the Morpho GraphQL API
#[derive(Debug, Clone)]
pub struct MorphoApiClient {
    http: Client,
    url: Url,
}

impl MorphoApiClient {
    /// Creates a client for the API at `url`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] for an unparsable URL and
    /// [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(url: &str) -> Result<Self, ApiError> {
        let url = Url::parse(url).map_err(|source| ApiError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, url })
    }

    /// Endpoint this client posts to
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Creation block, timestamp and asset symbols of a market
    pub async fn market_creation(
        &self,
        unique_key: &str,
        chain_id: u64,
    ) -> Result<MarketCreation, ApiError> {
        async {
            let body = json!({
                "query": MARKET_CREATION_QUERY,
                "variables": { "uniqueKey": unique_key, "chainId": chain_id },
            });

            let text = self
                .http
                .post(self.url.clone())
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;

            let creation = parse_market_creation(&text, unique_key, chain_id)?;
            info!(
                creation_block = creation.creation_block,
                creation_timestamp = %creation.creation_timestamp,
                "Fetched market creation metadata"
            );
            Ok::<_, ApiError>(creation)
        }
        .instrument(spans::market_creation(unique_key, chain_id))
        .await
    }
}
