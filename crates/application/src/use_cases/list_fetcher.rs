//! Remote list fetcher use case
//!
//! Every fetch is stamped with a generation number. A response is applied
//! only if its generation is still the latest issued, so a slow response to
//! a superseded filter or page change can never overwrite newer results.

use std::sync::atomic::{AtomicU64, Ordering};

use catalog_domain::{ListParams, LoadState, Product, ProductPage};
use parking_lot::Mutex;

use crate::ports::ProductGateway;
use crate::{ApplicationError, ApplicationResult};

/// Message shown when the product list cannot be loaded.
pub const LOAD_FAILED: &str = "Failed to load products. Please try again.";

/// Handle of one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    params: ListParams,
}

impl FetchTicket {
    /// Generation number of the fetch.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Parameters the fetch was issued with.
    #[must_use]
    pub const fn params(&self) -> &ListParams {
        &self.params
    }
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the displayed list.
    Applied {
        /// Total matching products reported by the service.
        total: u64,
    },
    /// A newer fetch was issued meanwhile; the response was dropped.
    Stale,
    /// The fetch failed; the previous list stays displayed.
    Failed(ApplicationError),
    /// Nothing changed, so no fetch was issued.
    Unchanged,
}

/// The displayed product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    /// Products of the current page.
    pub products: Vec<Product>,
    /// Total matching products as of the last applied response.
    pub total: u64,
    /// Loading state, including the failure message.
    pub load_state: LoadState,
}

/// Fetches product pages and reconciles them into the displayed list.
#[derive(Debug, Default)]
pub struct ListFetcher {
    latest: AtomicU64,
    view: Mutex<ListView>,
}

impl ListFetcher {
    /// Creates a fetcher with an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the displayed list.
    #[must_use]
    pub fn view(&self) -> ListView {
        self.view.lock().clone()
    }

    /// Issues a new generation and marks the list as loading.
    pub fn begin(&self, params: ListParams) -> FetchTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.lock().load_state = LoadState::Loading;
        tracing::debug!(generation, "fetching products");
        FetchTicket { generation, params }
    }

    /// Applies a response if `ticket` is still the latest fetch.
    pub fn complete(
        &self,
        ticket: &FetchTicket,
        result: ApplicationResult<ProductPage>,
    ) -> FetchOutcome {
        let mut view = self.view.lock();
        let latest = self.latest.load(Ordering::SeqCst);
        if ticket.generation != latest {
            tracing::debug!(
                generation = ticket.generation,
                latest,
                succeeded = result.is_ok(),
                "discarding stale list response"
            );
            return FetchOutcome::Stale;
        }
        match result {
            Ok(page) => {
                *view = ListView {
                    products: page.data,
                    total: page.total,
                    load_state: LoadState::Loaded,
                };
                FetchOutcome::Applied { total: page.total }
            }
            Err(error) => {
                tracing::warn!(%error, generation = ticket.generation, "product list fetch failed");
                view.load_state = LoadState::failed(error.load_error_kind(), LOAD_FAILED);
                FetchOutcome::Failed(error)
            }
        }
    }

    /// Fetches a page through `gateway` and applies it.
    pub async fn fetch<G: ProductGateway + ?Sized>(
        &self,
        gateway: &G,
        params: ListParams,
    ) -> FetchOutcome {
        let ticket = self.begin(params);
        let result = gateway.list_products(ticket.params()).await;
        self.complete(&ticket, result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing::{MockGateway, page, product};
    use catalog_domain::LoadErrorKind;
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    #[test]
    fn test_generations_increase() {
        let fetcher = ListFetcher::new();
        let first = fetcher.begin(ListParams::default());
        let second = fetcher.begin(ListParams::default());
        assert!(second.generation() > first.generation());
        assert!(fetcher.view().load_state.is_loading());
    }

    #[test]
    fn test_stale_success_is_discarded() {
        let fetcher = ListFetcher::new();
        let old = fetcher.begin(ListParams::default());
        let new = fetcher.begin(ListParams::default());

        let applied = fetcher.complete(&new, Ok(page(vec![product(2, "New", 5)], 1)));
        assert_eq!(applied, FetchOutcome::Applied { total: 1 });

        let stale = fetcher.complete(&old, Ok(page(vec![product(1, "Old", 5)], 1)));
        assert_eq!(stale, FetchOutcome::Stale);
        assert_eq!(fetcher.view().products[0].name, "New");
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let fetcher = ListFetcher::new();
        let old = fetcher.begin(ListParams::default());
        let new = fetcher.begin(ListParams::default());
        fetcher.complete(&new, Ok(page(vec![product(2, "New", 5)], 1)));

        let stale = fetcher.complete(&old, Err(ApplicationError::Timeout { timeout_ms: 10 }));
        assert_eq!(stale, FetchOutcome::Stale);
        assert_eq!(fetcher.view().load_state, LoadState::Loaded);
    }

    #[test]
    fn test_failure_keeps_previous_list() {
        let fetcher = ListFetcher::new();
        let first = fetcher.begin(ListParams::default());
        fetcher.complete(&first, Ok(page(vec![product(1, "Desk", 5)], 1)));

        let second = fetcher.begin(ListParams::default());
        let outcome = fetcher.complete(
            &second,
            Err(ApplicationError::Network("connection reset".to_string())),
        );
        assert!(matches!(outcome, FetchOutcome::Failed(_)));

        let view = fetcher.view();
        assert_eq!(view.products.len(), 1);
        assert_eq!(view.total, 1);
        assert_eq!(
            view.load_state,
            LoadState::failed(LoadErrorKind::Network, LOAD_FAILED)
        );
    }

    #[tokio::test]
    async fn test_out_of_order_responses_keep_latest() {
        let gateway = MockGateway::new();
        let fetcher = ListFetcher::new();
        let (release_slow, slow_gate) = oneshot::channel();
        gateway.queue_page(Some(slow_gate), Ok(page(vec![product(1, "Slow", 5)], 1)));
        gateway.queue_page(None, Ok(page(vec![product(2, "Fast", 5)], 2)));

        let slow = fetcher.fetch(&gateway, ListParams::default());
        let fast = async {
            let outcome = fetcher
                .fetch(
                    &gateway,
                    ListParams {
                        page: Some(2),
                        ..ListParams::default()
                    },
                )
                .await;
            release_slow.send(()).expect("receiver alive");
            outcome
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow, FetchOutcome::Stale);
        assert_eq!(fast, FetchOutcome::Applied { total: 1 });
        assert_eq!(fetcher.view().products[0].name, "Fast");
    }
}
