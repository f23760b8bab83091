//! Error types for identifier generation.

use thiserror::Error;

/// Errors surfaced by the bulk generation API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// Bulk count outside [1, 500]. Raised before any identifier is
    /// generated, so a failed call never produces a partial batch.
    #[error("count must be an integer between 1 and 500, got {count}")]
    InvalidCount { count: i64 },
}
