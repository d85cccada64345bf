pub mod status;
pub mod store;

pub use status::{compute_status, compute_status_at, start_boundary, end_boundary};
pub use store::RoundStore;
