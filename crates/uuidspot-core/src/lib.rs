//! RFC 4122 identifier generation for uuidspot.
//!
//! Pure functions over the host entropy/time source: no I/O, no state
//! beyond the process-wide v1 clock-sequence context.

mod error;
mod generate;
mod version;

pub use error::GenerateError;
pub use generate::{generate, generate_many, MAX_BULK_COUNT};
pub use version::UuidVersion;
