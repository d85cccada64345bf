pub mod settings;
pub mod rpc;

pub use settings::{Settings, AppSettings, ContentSettings, ResolverSettings, Environment};
pub use rpc::{RpcConfig, RpcEndpoint};
