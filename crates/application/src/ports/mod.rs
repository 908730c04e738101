//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod product_gateway;
mod sheet_reader;

pub use product_gateway::ProductGateway;
pub use sheet_reader::{SheetError, SheetReader};
