//! Application use cases (business logic orchestration).

mod category_cache;
mod import_products;
mod list_fetcher;
mod mutations;
mod session;

pub use category_cache::CategoryCache;
pub use import_products::{
    ImportError, ImportReport, ImportSession, ImportSnapshot, NO_FILE_SELECTED,
};
pub use list_fetcher::{FetchOutcome, FetchTicket, LOAD_FAILED, ListFetcher, ListView};
pub use mutations::{MutationCoordinator, MutationError};
pub use session::CatalogSession;
