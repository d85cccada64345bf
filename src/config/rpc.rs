use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub endpoints: HashMap<String, RpcEndpoint>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcEndpoint {
    pub url: String,
    pub priority: u8, // Lower is higher priority
    pub is_public: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        let mut endpoints = HashMap::new();

        // Ethereum mainnet, where ENS lives
        endpoints.insert("publicnode".to_string(), RpcEndpoint {
            url: "https://ethereum.publicnode.com".to_string(),
            priority: 1,
            is_public: true,
        });

        endpoints.insert("llamarpc".to_string(), RpcEndpoint {
            url: "https://eth.llamarpc.com".to_string(),
            priority: 2,
            is_public: true,
        });

        endpoints.insert("cloudflare".to_string(), RpcEndpoint {
            url: "https://cloudflare-eth.com".to_string(),
            priority: 3,
            is_public: true,
        });

        Self {
            endpoints,
            timeout_seconds: 10,
        }
    }
}

impl RpcConfig {
    /// Endpoints ordered for fallback, highest priority first. Ties are broken
    /// by name so the order is stable.
    pub fn ordered_endpoints(&self) -> Vec<(&str, &RpcEndpoint)> {
        let mut endpoints: Vec<(&str, &RpcEndpoint)> = self.endpoints
            .iter()
            .map(|(name, endpoint)| (name.as_str(), endpoint))
            .collect();

        endpoints.sort_by(|a, b| a.1.priority.cmp(&b.1.priority).then_with(|| a.0.cmp(b.0)));

        endpoints
    }

    pub fn primary_endpoint(&self) -> Option<&RpcEndpoint> {
        self.ordered_endpoints().first().map(|(_, endpoint)| *endpoint)
    }
}
