//! Screen state machines: list loading and two-phase deletion.
//!
//! These let a front end show appropriate feedback at each stage without
//! tracking flags of its own.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::product::ProductId;

/// Loading state of the product list.
///
/// - `Idle`: nothing requested yet
/// - `Loading`: a fetch is in flight
/// - `Loaded`: the latest fetch succeeded
/// - `Failed`: the latest fetch failed; the previous list stays visible
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    /// No fetch has been issued.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The latest fetch succeeded.
    Loaded,
    /// The latest fetch failed.
    Failed {
        /// Error category.
        kind: LoadErrorKind,
        /// Message shown above the table.
        message: String,
    },
}

impl LoadState {
    /// Creates a failed state.
    #[must_use]
    pub fn failed(kind: LoadErrorKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns the error message if the latest fetch failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Categories of list-load failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadErrorKind {
    /// The service could not be reached.
    Network,
    /// The service did not answer in time.
    Timeout,
    /// The service answered with an error status.
    Rejected,
    /// The response body could not be understood.
    InvalidResponse,
}

impl LoadErrorKind {
    /// Returns user-facing hints for this failure.
    #[must_use]
    pub const fn suggestions(&self) -> &[&'static str] {
        match self {
            Self::Network => &[
                "Check that the product service is running",
                "Verify the configured base URL",
            ],
            Self::Timeout => &[
                "The service may be slow or overloaded",
                "Try increasing the timeout value",
            ],
            Self::Rejected => &["Check the active filters"],
            Self::InvalidResponse => &["The service may be running an incompatible version"],
        }
    }
}

/// Phase of the confirm-then-commit delete flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeletePhase {
    /// No deletion pending.
    #[default]
    Idle,
    /// Waiting for the user to confirm.
    Confirming {
        /// Product to delete.
        id: ProductId,
        /// Name shown in the confirmation prompt.
        name: String,
    },
    /// The delete call is in flight; commit is disabled.
    Committing {
        /// Product being deleted.
        id: ProductId,
        /// Its name.
        name: String,
    },
}

impl DeletePhase {
    /// Asks for confirmation. Replaces a pending confirmation.
    ///
    /// # Errors
    ///
    /// Fails while a deletion is in flight.
    pub fn request(&mut self, id: ProductId, name: impl Into<String>) -> DomainResult<()> {
        if self.is_committing() {
            return Err(DomainError::InvalidDeleteTransition(
                "a deletion is already in progress".to_string(),
            ));
        }
        *self = Self::Confirming {
            id,
            name: name.into(),
        };
        Ok(())
    }

    /// Dismisses the confirmation. A no-op when idle.
    ///
    /// # Errors
    ///
    /// Fails while a deletion is in flight.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.is_committing() {
            return Err(DomainError::InvalidDeleteTransition(
                "cannot cancel a deletion in progress".to_string(),
            ));
        }
        *self = Self::Idle;
        Ok(())
    }

    /// Confirms the pending deletion and returns the product to delete.
    ///
    /// # Errors
    ///
    /// Fails when nothing is awaiting confirmation, including while a
    /// deletion is already in flight.
    pub fn commit(&mut self) -> DomainResult<(ProductId, String)> {
        match std::mem::take(self) {
            Self::Confirming { id, name } => {
                *self = Self::Committing {
                    id,
                    name: name.clone(),
                };
                Ok((id, name))
            }
            other => {
                let reason = if matches!(other, Self::Committing { .. }) {
                    "a deletion is already in progress"
                } else {
                    "no deletion awaiting confirmation"
                };
                *self = other;
                Err(DomainError::InvalidDeleteTransition(reason.to_string()))
            }
        }
    }

    /// Returns to idle after the delete call settled, successfully or not.
    pub fn finish(&mut self) {
        *self = Self::Idle;
    }

    /// Returns true while the delete call is in flight.
    #[must_use]
    pub const fn is_committing(&self) -> bool {
        matches!(self, Self::Committing { .. })
    }

    /// Returns the product awaiting confirmation or being deleted.
    #[must_use]
    pub fn target(&self) -> Option<(ProductId, &str)> {
        match self {
            Self::Idle => None,
            Self::Confirming { id, name } | Self::Committing { id, name } => Some((*id, name)),
        }
    }
}
