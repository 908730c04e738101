//! Category cache use case

use catalog_domain::{default_categories, merge_categories};
use parking_lot::Mutex;

use crate::ports::ProductGateway;

/// Known categories, falling back to a fixed default set.
///
/// Starts with the defaults so forms have options before the first load.
pub struct CategoryCache {
    categories: Mutex<Vec<String>>,
}

impl CategoryCache {
    /// Creates a cache holding the default categories.
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: Mutex::new(default_categories()),
        }
    }

    /// Returns the cached categories.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.categories.lock().clone()
    }

    /// Reloads from the product service and returns the new list.
    ///
    /// Remote categories are merged after the defaults; when the service
    /// cannot be reached the cache falls back to the defaults alone.
    pub async fn reload<G: ProductGateway + ?Sized>(&self, gateway: &G) -> Vec<String> {
        let categories = match gateway.list_categories().await {
            Ok(remote) => merge_categories(&remote),
            Err(error) => {
                tracing::warn!(%error, "could not load categories, using defaults");
                default_categories()
            }
        };
        let mut cached = self.categories.lock();
        cached.clone_from(&categories);
        categories
    }
}

impl Default for CategoryCache {
    fn default() -> Self {
        Self::new()
    }
}
