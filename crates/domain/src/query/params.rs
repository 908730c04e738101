//! Outgoing list parameters and their query-string form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::filter::{SortField, SortOrder};
use crate::error::{DomainError, DomainResult};

/// Parameters of a product list request.
///
/// Every field is optional; a field is only present when it differs from
/// the service default, so both requests and shareable links stay compact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number when not 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size when not 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Search text when not empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Category when not empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Lower price bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    /// Upper price bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
    /// Sort column when not `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    /// Sort direction when not `asc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl ListParams {
    /// Encodes the parameters as a URL query string (no leading `?`).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuery` if encoding fails.
    pub fn to_query_string(&self) -> DomainResult<String> {
        serde_urlencoded::to_string(self).map_err(|e| DomainError::InvalidQuery(e.to_string()))
    }

    /// Decodes parameters from a URL query string; a leading `?` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuery` if a value cannot be decoded.
    pub fn from_query_string(query: &str) -> DomainResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        serde_urlencoded::from_str(query).map_err(|e| DomainError::InvalidQuery(e.to_string()))
    }

    /// Returns true if every parameter is at its default.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
