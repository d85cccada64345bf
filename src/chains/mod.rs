pub mod client;
pub mod ens_api;
pub mod ens_rpc;
pub mod resilience;

pub use client::{NameApi, NameRpc};
pub use ens_api::EnsApiClient;
pub use ens_rpc::FallbackRpcClient;
pub use resilience::{race_timeout, Timed};
