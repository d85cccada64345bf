pub mod models;
pub mod config;
pub mod chains;
pub mod rounds;
pub mod resolver;
pub mod verification;

pub use models::{
    AddressClaim, GrantsError, InputType, ResolutionResult, Result, Round, RoundStatus, RoundWindow,
};
pub use config::{Settings, RpcConfig};
pub use rounds::{compute_status, compute_status_at, RoundStore};
pub use resolver::{is_avatar_safe, AddressResolver};
pub use verification::SubmissionVerifier;
