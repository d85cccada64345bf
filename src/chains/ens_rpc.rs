use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider, ProviderError},
    types::Address,
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    chains::NameRpc,
    config::RpcConfig,
    models::{GrantsError, Result},
};

/// ENS lookups over a list of JSON-RPC endpoints. Endpoints are tried in
/// priority order; the first one that answers wins, including a definitive
/// "no such name".
pub struct FallbackRpcClient {
    providers: Vec<(String, Provider<Http>)>,
}

impl FallbackRpcClient {
    pub fn new(config: &RpcConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GrantsError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        let mut providers = Vec::new();
        for (name, endpoint) in config.ordered_endpoints() {
            let url = reqwest::Url::parse(&endpoint.url)
                .map_err(|e| GrantsError::ConfigError(format!("Invalid RPC URL {}: {}", endpoint.url, e)))?;
            let provider = Provider::new(Http::new_with_client(url, http_client.clone()));
            providers.push((name.to_string(), provider));
        }

        if providers.is_empty() {
            return Err(GrantsError::ConfigError("No RPC endpoints configured".to_string()));
        }

        Ok(Self { providers })
    }

    pub fn endpoint_names(&self) -> Vec<&str> {
        self.providers.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// The registry answered, there is just nothing set for the name.
fn is_not_found(error: &ProviderError) -> bool {
    matches!(error, ProviderError::EnsError(_) | ProviderError::EnsNotOwned(_))
}

fn rpc_error(endpoint: &str, error: ProviderError) -> GrantsError {
    GrantsError::RpcError {
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}

#[async_trait]
impl NameRpc for FallbackRpcClient {
    async fn resolve_name(&self, name: &str) -> Result<Option<Address>> {
        let mut last_error = None;

        for (endpoint, provider) in &self.providers {
            match provider.resolve_name(name).await {
                Ok(address) if address.is_zero() => return Ok(None),
                Ok(address) => return Ok(Some(address)),
                Err(e) if is_not_found(&e) => {
                    debug!("{} has no address record ({})", name, e);
                    return Ok(None);
                }
                Err(e) => {
                    warn!("RPC endpoint {} failed resolving {}: {}", endpoint, name, e);
                    last_error = Some(rpc_error(endpoint, e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GrantsError::ConfigError("No RPC endpoints configured".to_string())))
    }

    async fn resolve_avatar(&self, name: &str) -> Result<Option<String>> {
        let mut last_error = None;

        for (endpoint, provider) in &self.providers {
            match provider.resolve_avatar(name).await {
                Ok(url) => return Ok(Some(url.to_string())),
                Err(e) if is_not_found(&e) => return Ok(None),
                Err(e) => {
                    debug!("RPC endpoint {} failed fetching avatar for {}: {}", endpoint, name, e);
                    last_error = Some(rpc_error(endpoint, e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GrantsError::ConfigError("No RPC endpoints configured".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RpcEndpoint;
    use std::collections::HashMap;

    #[test]
    fn test_providers_follow_priority() {
        let client = FallbackRpcClient::new(&RpcConfig::default()).unwrap();
        assert_eq!(client.endpoint_names(), vec!["publicnode", "llamarpc", "cloudflare"]);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut endpoints = HashMap::new();
        endpoints.insert("bad".to_string(), RpcEndpoint {
            url: "not a url".to_string(),
            priority: 1,
            is_public: true,
        });
        let config = RpcConfig { endpoints, timeout_seconds: 5 };

        assert!(matches!(FallbackRpcClient::new(&config), Err(GrantsError::ConfigError(_))));
    }

    #[test]
    fn test_empty_config_rejected() {
        let config = RpcConfig { endpoints: HashMap::new(), timeout_seconds: 5 };
        assert!(FallbackRpcClient::new(&config).is_err());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(is_not_found(&ProviderError::EnsError("nobody.eth".to_string())));
        assert!(!is_not_found(&ProviderError::CustomError("boom".to_string())));
    }
}
