//! Error types for the scope hierarchy index

use thiserror::Error;

/// Scope hierarchy errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// Referenced domain or project does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate domain or project id
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Project still has child projects
    #[error("Project not empty: {0}")]
    ProjectNotEmpty(String),

    /// Operation not allowed in the current state
    #[error("Forbidden action: {0}")]
    ForbiddenAction(String),

    /// Malformed identifier or invalid structure
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for hierarchy operations
pub type Result<T> = std::result::Result<T, ResourceError>;
