//! Catalog Domain - Core business types
//!
//! This crate defines the domain model of the catalog admin core: products,
//! the list query controller, the import pipeline stages and the screen
//! state machines. All types here are pure Rust with no I/O dependencies.

pub mod category;
pub mod error;
pub mod import;
pub mod product;
pub mod query;
pub mod state;

pub use category::{DEFAULT_CATEGORIES, default_categories, merge_categories};
pub use error::{DomainError, DomainResult};
pub use import::{
    CanonicalField, CellValue, HeaderRule, HeaderRules, ImportOutcome, NO_VALID_ROWS,
    PREVIEW_ROWS, RawRow, RowError, UploadStats, process_rows,
};
pub use product::{
    CanonicalRecord, FieldError, FieldErrors, FormField, Product, ProductDraft, ProductForm,
    ProductId, ProductPage,
};
pub use query::{
    FilterKey, FilterState, ListParams, PageLimit, PaginationState, QueryController, QueryPolicy,
    QueryState, SortField, SortOrder,
};
pub use state::{DeletePhase, LoadErrorKind, LoadState};
