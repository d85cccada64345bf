use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::RpcConfig;
use crate::resolver::avatar::DEFAULT_AVATAR_HOSTS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub content: ContentSettings,
    pub resolver: ResolverSettings,
    pub rpc: RpcConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSettings {
    pub rounds_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// `GET {api_base_url}/{name}` returns `{"address": ...}`
    pub api_base_url: String,
    /// `HEAD {avatar_base_url}/{name}` checks for an avatar image
    pub avatar_base_url: String,
    pub fast_path_timeout_ms: u64,
    pub slow_path_timeout_ms: u64,
    pub avatar_timeout_ms: u64,
    pub debounce_ms: u64,
    pub http_timeout_seconds: u64,
    pub avatar_allowlist: Vec<String>,
}

impl ResolverSettings {
    pub fn fast_path_timeout(&self) -> Duration {
        Duration::from_millis(self.fast_path_timeout_ms)
    }

    pub fn slow_path_timeout(&self) -> Duration {
        Duration::from_millis(self.slow_path_timeout_ms)
    }

    pub fn avatar_timeout(&self) -> Duration {
        Duration::from_millis(self.avatar_timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.ensideas.com/ens/resolve".to_string(),
            avatar_base_url: "https://metadata.ens.domains/mainnet/avatar".to_string(),
            fast_path_timeout_ms: 2_000,
            slow_path_timeout_ms: 4_000,
            avatar_timeout_ms: 1_500,
            debounce_ms: 200,
            http_timeout_seconds: 10,
            avatar_allowlist: DEFAULT_AVATAR_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Grants Core".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
                environment: Environment::Development,
            },
            content: ContentSettings {
                rounds_dir: PathBuf::from("content/rounds"),
            },
            resolver: ResolverSettings::default(),
            rpc: RpcConfig::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("GRANTS").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?;

        s.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        let r = &self.resolver;

        if r.fast_path_timeout_ms == 0 || r.slow_path_timeout_ms == 0 || r.avatar_timeout_ms == 0 {
            return Err("Resolver timeouts must be greater than zero".to_string());
        }

        for (field, url) in [("api_base_url", &r.api_base_url), ("avatar_base_url", &r.avatar_base_url)] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(format!("resolver.{} must be an http(s) URL, got {}", field, url));
            }
        }

        if r.avatar_allowlist.iter().any(|host| host.trim().is_empty()) {
            return Err("Avatar allow-list entries must not be empty".to_string());
        }

        if self.rpc.endpoints.is_empty() {
            return Err("At least one RPC endpoint must be configured".to_string());
        }

        Ok(())
    }
}
