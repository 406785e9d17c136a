//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// An aggregate with the same identity already exists.
    #[error("aggregate already exists: {0}")]
    AlreadyExists(Uuid),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
