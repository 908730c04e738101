//! Catalog Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (product service, tabular file reader)
//! - Use case orchestration (list fetching, mutations, imports)
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{ProductGateway, SheetError, SheetReader};
pub use use_cases::{
    CatalogSession, CategoryCache, FetchOutcome, FetchTicket, ImportError, ImportReport,
    ImportSession, ImportSnapshot, LOAD_FAILED, ListFetcher, ListView, MutationCoordinator,
    MutationError, NO_FILE_SELECTED,
};
