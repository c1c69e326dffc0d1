//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A JSON path expression could not be parsed.
    #[error("invalid JSON path '{path}': {reason}")]
    InvalidJsonPath {
        /// The offending path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A seed value is unusable for building fixtures.
    #[error("invalid seed value for {field}: {reason}")]
    InvalidSeed {
        /// Seed field name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A lifecycle id was written twice.
    #[error("{field} already set to {current}")]
    AlreadyAssigned {
        /// Lifecycle field name.
        field: &'static str,
        /// Value already stored.
        current: i64,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
