mod cents;
mod helpers;
mod secret;

pub use cents::{Cents, CentsConversionError};
pub use helpers::parse_boolean_flag;
pub use secret::Secret;
