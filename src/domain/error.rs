//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors describe edits that can never apply, independent of any file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("invalid heading selector: '{0}'")]
    InvalidHeading(String),

    #[error("invalid table: {message}")]
    InvalidTable { message: String },

    #[error("invalid edit: {message}")]
    InvalidEdit { message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
