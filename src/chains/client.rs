use async_trait::async_trait;
use ethers::types::Address;

use crate::models::Result;

/// Fast, third-party HTTP resolution service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NameApi: Send + Sync {
    /// Raw address string the service reports for `name`, if any. A non-OK
    /// response is `Ok(None)`.
    async fn lookup_address(&self, name: &str) -> Result<Option<String>>;

    /// URL of an avatar image for `name` if the metadata service has one.
    async fn check_avatar(&self, name: &str) -> Result<Option<String>>;
}

/// Authoritative on-chain resolution over JSON-RPC.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NameRpc: Send + Sync {
    async fn resolve_name(&self, name: &str) -> Result<Option<Address>>;

    async fn resolve_avatar(&self, name: &str) -> Result<Option<String>>;
}
