pub mod round;
pub mod resolution;
pub mod error;

pub use round::*;
pub use resolution::*;
pub use error::*;
