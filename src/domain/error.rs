//! Domain errors

use thiserror::Error;

/// Domain-level error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Malformed or missing required field
    #[error("Validation: {0}")]
    Validation(String),

    /// Status precondition violated for check-in/checkout
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Unknown id referenced by update/delete/checkin/checkout
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Duplicate spot number on create/update
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Durable-store failure, treated as transient/retryable by the caller
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
