//! Error types for the assignment engine

use thiserror::Error;

/// Assignment engine errors
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// Referenced actor, scope, role, or grant does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate create where uniqueness is required
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed identifier or filter
    #[error("Validation error: {0}")]
    Validation(String),

    /// Hierarchy index error
    #[error("Resource error: {0}")]
    Resource(#[from] tenet_resource::ResourceError),

    /// Identity index error
    #[error("Identity error: {0}")]
    Identity(#[from] tenet_identity::IdentityError),

    /// Assignment store backend error
    #[error("Store error: {0}")]
    Store(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for assignment operations
pub type Result<T> = std::result::Result<T, AssignmentError>;
