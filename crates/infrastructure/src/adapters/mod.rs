//! Adapters implementing application ports.

mod reqwest_gateway;

pub use reqwest_gateway::{REQUEST_ID_HEADER, ReqwestProductGateway};
