//! Product service port

use async_trait::async_trait;
use catalog_domain::{CanonicalRecord, ListParams, Product, ProductDraft, ProductId, ProductPage};

use crate::ApplicationResult;

/// Port for the remote product service.
///
/// Implementations translate transport failures into `ApplicationError`
/// variants; an error body's `detail` string ends up in
/// `ApplicationError::Rejected`.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    /// Fetches one page of products. Absent parameters are not sent.
    async fn list_products(&self, params: &ListParams) -> ApplicationResult<ProductPage>;

    /// Fetches the categories known to the service.
    async fn list_categories(&self) -> ApplicationResult<Vec<String>>;

    /// Fetches a single product.
    async fn get_product(&self, id: ProductId) -> ApplicationResult<Product>;

    /// Creates a product.
    async fn create_product(&self, draft: &ProductDraft) -> ApplicationResult<Product>;

    /// Replaces the writable fields of a product.
    async fn update_product(&self, id: ProductId, draft: &ProductDraft)
    -> ApplicationResult<Product>;

    /// Deletes a product.
    async fn delete_product(&self, id: ProductId) -> ApplicationResult<()>;

    /// Submits a batch of records; returns how many the service accepted.
    async fn bulk_upload(&self, records: &[CanonicalRecord]) -> ApplicationResult<u64>;
}
