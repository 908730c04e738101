//! Application error types

use thiserror::Error;
use catalog_domain::{DomainError, LoadErrorKind};

/// Application-level errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The product service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The product service did not answer in time.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The product service answered with an error status.
    #[error("request rejected with status {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The `detail` string of the error body, when present.
        detail: Option<String>,
    },

    /// A response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApplicationError {
    /// Message for the user: the server-declared detail when there is one,
    /// otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Returns the list-load category of this error.
    #[must_use]
    pub const fn load_error_kind(&self) -> LoadErrorKind {
        match self {
            Self::Network(_) => LoadErrorKind::Network,
            Self::Timeout { .. } => LoadErrorKind::Timeout,
            Self::Rejected { .. } | Self::Domain(_) => LoadErrorKind::Rejected,
            Self::Decode(_) => LoadErrorKind::InvalidResponse,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
