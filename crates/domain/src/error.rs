//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A price bound or price cell could not be read as a decimal.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// The page size is not one of the supported limits.
    #[error("invalid page size: {0} (expected one of 5, 10, 25, 50)")]
    InvalidLimit(u32),

    /// The sort column is not sortable.
    #[error("invalid sort column: {0}")]
    InvalidSortField(String),

    /// The sort direction is neither `asc` nor `desc`.
    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),

    /// A persisted query string could not be decoded.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A delete transition was requested from the wrong phase.
    #[error("invalid delete transition: {0}")]
    InvalidDeleteTransition(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
