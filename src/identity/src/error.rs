//! Error types for the identity index

use thiserror::Error;

/// Identity index errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Referenced user or group does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate user or group id
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed identifier
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for identity operations
pub type Result<T> = std::result::Result<T, IdentityError>;
