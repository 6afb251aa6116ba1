// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider creation for Base, where the tracked Morpho Blue market lives
//!
//! RPC endpoints come from environment variables (a `.env` file is honored
//! through `dotenvy`):
//!
//! - `BASE_RPC_URL`: endpoint, required
//! - `API_KEY`: optional key appended to the endpoint as `{url}{key}/`

use alloy_chains::NamedChain;
use alloy_provider::RootProvider;
use alloy_rpc_client::RpcClient;
use alloy_transport_http::Http;
use dotenvy::var;
use op_alloy_network::Optimism;
use thiserror::Error;
use tracing::debug;

/// Environment variable holding an optional key appended to the RPC URL
pub const API_KEY_ENV_VAR: &str = "API_KEY";

/// Errors that can occur when creating providers
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Chain has no configured RPC environment variable
    #[error("Unsupported chain: {0:?}")]
    UnsupportedChain(NamedChain),

    /// Required environment variable is missing
    #[error("Missing environment variable {0}: {1}")]
    MissingEnvVar(&'static str, #[source] dotenvy::Error),

    /// Invalid RPC URL format
    #[error("Invalid URL {0}: {1}")]
    InvalidUrl(String, #[source] url::ParseError),
}

/// Get environment variable name for a chain's RPC URL
pub fn rpc_url_env_var(chain: NamedChain) -> Result<&'static str, ProviderError> {
    match chain {
        NamedChain::Base => Ok("BASE_RPC_URL"),
        _ => Err(ProviderError::UnsupportedChain(chain)),
    }
}

/// Joins an endpoint with an optional API key
pub fn join_api_key(api_url: &str, api_key: Option<&str>) -> String {
    match api_key {
        Some(key) if !key.is_empty() => format!("{api_url}{key}/"),
        _ => api_url.to_string(),
    }
}

/// Build RPC URL from environment variables
pub fn build_rpc_url(chain: NamedChain) -> Result<String, ProviderError> {
    let url_var = rpc_url_env_var(chain)?;
    let api_url = var(url_var).map_err(|e| ProviderError::MissingEnvVar(url_var, e))?;
    let api_key = var(API_KEY_ENV_VAR).ok();

    debug!(
        chain = ?chain,
        env_var = url_var,
        with_api_key = api_key.is_some(),
        "Resolved RPC URL from environment"
    );

    Ok(join_api_key(&api_url, api_key.as_deref()))
}

/// Create read-only provider for Base
///
/// Reads the RPC URL from environment variables. See [`build_rpc_url`].
///
/// # Example
///
/// ```no_run
/// use alloy_provider::Provider;
/// use morphoscan::provider::create_base_provider;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = create_base_provider()?;
/// let block_number = provider.get_block_number().await?;
/// # Ok(())
/// # }
/// ```
pub fn create_base_provider() -> Result<RootProvider<Optimism>, ProviderError> {
    let rpc_url = build_rpc_url(NamedChain::Base)?;
    create_optimism_provider_from_url(rpc_url)
}

/// Create Optimism provider from explicit RPC URL
///
/// Useful for testing or when RPC URLs are provided directly.
///
/// # Example
///
/// ```no_run
/// use morphoscan::provider::create_optimism_provider_from_url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = create_optimism_provider_from_url(
///     "https://base-mainnet.g.alchemy.com/v2/YOUR_KEY".to_string()
/// )?;
/// # Ok(())
/// # }
/// ```
pub fn create_optimism_provider_from_url(
    rpc_url: String,
) -> Result<RootProvider<Optimism>, ProviderError> {
    let http = Http::new(
        rpc_url
            .parse()
            .map_err(|e| ProviderError::InvalidUrl(rpc_url.clone(), e))?,
    );
    let client = RpcClient::new(http, false);
    Ok(RootProvider::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_url_env_var() {
        assert_eq!(rpc_url_env_var(NamedChain::Base).unwrap(), "BASE_RPC_URL");
    }

    #[test]
    fn test_unsupported_chain() {
        for chain in [NamedChain::Mainnet, NamedChain::Celo] {
            let result = rpc_url_env_var(chain);
            assert!(matches!(result, Err(ProviderError::UnsupportedChain(_))));
        }
    }

    #[test]
    fn test_join_api_key() {
        assert_eq!(
            join_api_key("https://base-mainnet.example/v2/", Some("abc")),
            "https://base-mainnet.example/v2/abc/"
        );
        assert_eq!(
            join_api_key("https://mainnet.base.org", None),
            "https://mainnet.base.org"
        );
        assert_eq!(
            join_api_key("https://mainnet.base.org", Some("")),
            "https://mainnet.base.org"
        );
    }

    #[test]
    fn test_invalid_url() {
        let result = create_optimism_provider_from_url("not a url".to_string());
        assert!(matches!(result, Err(ProviderError::InvalidUrl(..))));
    }
}
