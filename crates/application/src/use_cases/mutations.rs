//! Mutation coordinator use case
//!
//! Create, update, delete and bulk import against the product service.
//! Nothing is applied locally before the service confirms; a confirmed
//! mutation refreshes the list and the categories.

use std::sync::Arc;

use catalog_domain::{
    CanonicalRecord, DeletePhase, DomainError, FieldErrors, Product, ProductForm, ProductId,
};
use parking_lot::Mutex;
use thiserror::Error;

use super::session::CatalogSession;
use crate::ApplicationError;
use crate::ports::ProductGateway;

const CREATE_FAILED: &str = "Failed to create product. Please try again.";
const UPDATE_FAILED: &str = "Failed to update product. Please try again.";
const DELETE_FAILED: &str = "Failed to delete product. Please try again.";
const IMPORT_FAILED: &str = "Failed to import products. Please try again.";

/// Errors that can occur when mutating products.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The form failed client-side validation; nothing was sent.
    #[error("{0}")]
    Invalid(FieldErrors),

    /// The delete flow was driven out of order.
    #[error("{0}")]
    Transition(#[from] DomainError),

    /// The product service did not confirm the mutation.
    #[error("{message}")]
    Failed {
        /// Message for the user.
        message: String,
        /// Underlying failure.
        source: ApplicationError,
    },
}

impl MutationError {
    fn failed(source: ApplicationError, fallback: &str) -> Self {
        Self::Failed {
            message: source.user_message(fallback),
            source,
        }
    }
}

/// Coordinates product mutations for a catalog session.
pub struct MutationCoordinator<G: ProductGateway> {
    session: Arc<CatalogSession<G>>,
    delete_phase: Mutex<DeletePhase>,
}

impl<G: ProductGateway> MutationCoordinator<G> {
    /// Creates a coordinator refreshing `session` after each mutation.
    pub fn new(session: Arc<CatalogSession<G>>) -> Self {
        Self {
            session,
            delete_phase: Mutex::new(DeletePhase::Idle),
        }
    }

    /// Returns the session refreshed by this coordinator.
    #[must_use]
    pub const fn session(&self) -> &Arc<CatalogSession<G>> {
        &self.session
    }

    /// Validates and creates a product.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Invalid` without contacting the service when
    /// the form is invalid, `MutationError::Failed` when the service refuses.
    pub async fn create(&self, form: &ProductForm) -> Result<Product, MutationError> {
        let draft = form.validate().map_err(MutationError::Invalid)?;
        let product = self
            .session
            .gateway()
            .create_product(&draft)
            .await
            .map_err(|e| MutationError::failed(e, CREATE_FAILED))?;
        tracing::info!(id = product.id, "product created");
        self.session.refresh().await;
        Ok(product)
    }

    /// Validates and updates a product.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn update(&self, id: ProductId, form: &ProductForm) -> Result<Product, MutationError> {
        let draft = form.validate().map_err(MutationError::Invalid)?;
        let product = self
            .session
            .gateway()
            .update_product(id, &draft)
            .await
            .map_err(|e| MutationError::failed(e, UPDATE_FAILED))?;
        tracing::info!(id, "product updated");
        self.session.refresh().await;
        Ok(product)
    }

    /// Loads a product and prefills the edit form with it.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Failed` if the product cannot be loaded.
    pub async fn edit_form(&self, id: ProductId) -> Result<ProductForm, MutationError> {
        let product = self
            .session
            .gateway()
            .get_product(id)
            .await
            .map_err(|e| MutationError::failed(e, "Failed to load product. Please try again."))?;
        Ok(ProductForm::from_product(&product))
    }

    /// Returns the delete flow phase.
    #[must_use]
    pub fn delete_phase(&self) -> DeletePhase {
        self.delete_phase.lock().clone()
    }

    /// Asks for confirmation before deleting.
    ///
    /// # Errors
    ///
    /// Fails while a deletion is in flight.
    pub fn request_delete(&self, id: ProductId, name: &str) -> Result<(), MutationError> {
        Ok(self.delete_phase.lock().request(id, name)?)
    }

    /// Dismisses the pending confirmation.
    ///
    /// # Errors
    ///
    /// Fails while a deletion is in flight.
    pub fn cancel_delete(&self) -> Result<(), MutationError> {
        Ok(self.delete_phase.lock().cancel()?)
    }

    /// Deletes the product awaiting confirmation. The flow returns to idle
    /// whether or not the service confirms.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Transition` if nothing awaits confirmation or
    /// a deletion is already in flight, `MutationError::Failed` if the
    /// service refuses.
    pub async fn confirm_delete(&self) -> Result<ProductId, MutationError> {
        let (id, name) = self.delete_phase.lock().commit()?;
        let result = self.session.gateway().delete_product(id).await;
        self.delete_phase.lock().finish();
        match result {
            Ok(()) => {
                tracing::info!(id, %name, "product deleted");
                self.session.refresh().await;
                Ok(id)
            }
            Err(error) => {
                tracing::warn!(id, %error, "product delete failed");
                Err(MutationError::failed(error, DELETE_FAILED))
            }
        }
    }

    /// Submits a batch of validated records in one call and returns the
    /// number accepted.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Failed` if the service refuses the batch.
    pub async fn bulk_import(&self, records: &[CanonicalRecord]) -> Result<u64, MutationError> {
        let accepted = self
            .session
            .gateway()
            .bulk_upload(records)
            .await
            .map_err(|e| MutationError::failed(e, IMPORT_FAILED))?;
        tracing::info!(submitted = records.len(), accepted, "bulk import finished");
        self.session.refresh().await;
        Ok(accepted)
    }
}
