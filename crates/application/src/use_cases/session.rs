//! Catalog session use case
//!
//! Ties the query controller, the list fetcher and the category cache
//! together for one product screen. Every state change that affects the
//! list triggers a fetch with the resulting parameters.

use std::sync::Arc;

use catalog_domain::{
    FilterKey, PaginationState, QueryController, QueryPolicy, QueryState, SortField,
};
use parking_lot::Mutex;

use super::category_cache::CategoryCache;
use super::list_fetcher::{FetchOutcome, ListFetcher, ListView};
use crate::ApplicationResult;
use crate::ports::ProductGateway;

/// State of one product screen.
pub struct CatalogSession<G: ProductGateway> {
    gateway: Arc<G>,
    controller: Mutex<QueryController>,
    fetcher: ListFetcher,
    categories: CategoryCache,
}

impl<G: ProductGateway> CatalogSession<G> {
    /// Creates a session at the default query state.
    pub fn new(gateway: Arc<G>, policy: QueryPolicy) -> Self {
        Self::with_controller(gateway, QueryController::new(policy))
    }

    /// Restores a session from a shareable link's query string.
    ///
    /// A link that cannot be decoded falls back to the default state.
    pub fn restore(gateway: Arc<G>, link: &str, policy: QueryPolicy) -> Self {
        let controller = QueryController::deserialize(link, policy).unwrap_or_else(|error| {
            tracing::warn!(%error, link, "ignoring invalid query link");
            QueryController::new(policy)
        });
        Self::with_controller(gateway, controller)
    }

    fn with_controller(gateway: Arc<G>, controller: QueryController) -> Self {
        Self {
            gateway,
            controller: Mutex::new(controller),
            fetcher: ListFetcher::new(),
            categories: CategoryCache::new(),
        }
    }

    /// Returns the product service.
    #[must_use]
    pub const fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Returns the persisted query state.
    #[must_use]
    pub fn query_state(&self) -> QueryState {
        self.controller.lock().query_state().clone()
    }

    /// Returns the pagination as displayed.
    #[must_use]
    pub fn pagination(&self) -> PaginationState {
        self.controller.lock().pagination()
    }

    /// Returns the shareable link for the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be encoded.
    pub fn link(&self) -> ApplicationResult<String> {
        Ok(self.controller.lock().serialize()?)
    }

    /// Returns the displayed product list.
    #[must_use]
    pub fn view(&self) -> ListView {
        self.fetcher.view()
    }

    /// Returns the cached categories.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.categories.categories()
    }

    /// Updates a filter and refetches if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid price bound; nothing is fetched.
    pub async fn set_filter(&self, key: FilterKey, value: &str) -> ApplicationResult<FetchOutcome> {
        let changed = self.controller.lock().set_filter(key, value)?;
        if !changed {
            return Ok(FetchOutcome::Unchanged);
        }
        Ok(self.refresh_list().await)
    }

    /// Applies a column-header click and refetches.
    pub async fn set_sort(&self, column: SortField) -> FetchOutcome {
        self.controller.lock().set_sort(column);
        self.refresh_list().await
    }

    /// Changes the page size and refetches.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported page size; nothing is fetched.
    pub async fn set_limit(&self, limit: u32) -> ApplicationResult<FetchOutcome> {
        self.controller.lock().set_limit(limit)?;
        Ok(self.refresh_list().await)
    }

    /// Moves to a page (clamped) and refetches.
    pub async fn set_page(&self, page: u32) -> FetchOutcome {
        self.controller.lock().set_page(page);
        self.refresh_list().await
    }

    /// Fetches the list for the current state.
    ///
    /// If the reported total moves the current page back into range, the
    /// clamped page is fetched once more.
    pub async fn refresh_list(&self) -> FetchOutcome {
        let mut outcome = self.fetch_current().await;
        if let FetchOutcome::Applied { total } = outcome {
            let moved = self.controller.lock().apply_totals(total);
            if moved {
                tracing::debug!(total, "page out of range, refetching clamped page");
                outcome = self.fetch_current().await;
                if let FetchOutcome::Applied { total } = outcome {
                    self.controller.lock().apply_totals(total);
                }
            }
        }
        outcome
    }

    async fn fetch_current(&self) -> FetchOutcome {
        let params = self.controller.lock().to_request_params();
        self.fetcher.fetch(self.gateway.as_ref(), params).await
    }

    /// Reloads the categories.
    pub async fn reload_categories(&self) -> Vec<String> {
        self.categories.reload(self.gateway.as_ref()).await
    }

    /// Reloads both the list and the categories.
    pub async fn refresh(&self) -> FetchOutcome {
        let (outcome, _) = tokio::join!(self.refresh_list(), self.reload_categories());
        outcome
    }
}
