//! HTTP Header Map.
mod error;
mod map;
mod iter;

#[cfg(feature = "serde")]
mod serde;

pub use error::HeaderError;
pub use map::{HeaderMap, validate_name, validate_value};
pub use iter::{Iter, WithDefaults};

#[cfg(test)]
mod test;
