pub mod address;
pub mod address_resolver;
pub mod avatar;
pub mod debounce;
pub mod name;

pub use address::{checksum, is_literal_address, parse_literal_address};
pub use address_resolver::{AddressResolver, ResolverTimeouts};
pub use avatar::{is_avatar_safe, AvatarPolicy};
pub use debounce::{run_debounced, DebounceEffect, DebounceEvent, DebounceState};
pub use name::normalize_name;
