//! Catalog Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading and
//! tracing setup.

pub mod adapters;
pub mod config;
pub mod import;
pub mod logging;

pub use adapters::{REQUEST_ID_HEADER, ReqwestProductGateway};
pub use config::{ClientConfig, ConfigError};
pub use import::{DEFAULT_MAX_FILE_SIZE, SheetFormat, TabularSheetReader};
pub use logging::{DEFAULT_FILTER, init_tracing};
