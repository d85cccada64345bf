use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    chains::NameApi,
    config::ResolverSettings,
    models::{GrantsError, Result},
};

/// HTTP client for the resolution API and the avatar metadata service.
pub struct EnsApiClient {
    http_client: reqwest::Client,
    api_base_url: String,
    avatar_base_url: String,
}

#[derive(Deserialize)]
struct ResolveResponse {
    #[serde(default)]
    address: Option<String>,
}

impl EnsApiClient {
    pub fn new(settings: &ResolverSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.http_timeout_seconds))
            .build()
            .map_err(|e| GrantsError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            avatar_base_url: settings.avatar_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn address_url(&self, name: &str) -> String {
        format!("{}/{}", self.api_base_url, name)
    }

    pub fn avatar_url(&self, name: &str) -> String {
        format!("{}/{}", self.avatar_base_url, name)
    }
}

#[async_trait]
impl NameApi for EnsApiClient {
    async fn lookup_address(&self, name: &str) -> Result<Option<String>> {
        let response = self.http_client
            .get(self.address_url(name))
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("Resolution API returned {} for {}", response.status(), name);
            return Ok(None);
        }

        let body: ResolveResponse = response.json().await?;
        Ok(body.address.filter(|a| !a.trim().is_empty()))
    }

    async fn check_avatar(&self, name: &str) -> Result<Option<String>> {
        let url = self.avatar_url(name);
        let response = self.http_client
            .head(&url)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(Some(url))
        } else {
            debug!("No avatar for {} ({})", name, response.status());
            Ok(None)
        }
    }
}
