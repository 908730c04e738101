//! Filter and sort state of the product list.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Filter inputs that narrow the result set. Sorting is not a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    /// Free-text search box.
    Search,
    /// Category select.
    Category,
    /// Lower price bound.
    MinPrice,
    /// Upper price bound.
    MaxPrice,
}

impl FilterKey {
    /// Returns the request parameter name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Category => "category",
            Self::MinPrice => "min_price",
            Self::MaxPrice => "max_price",
        }
    }
}

/// Sortable product columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Service identifier (default).
    #[default]
    Id,
    /// Product name.
    Name,
    /// Unit price.
    Price,
    /// Category label.
    Category,
    /// Creation timestamp.
    CreatedAt,
}

impl SortField {
    /// Every sortable column, in table order.
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::Name,
        Self::Price,
        Self::Category,
        Self::CreatedAt,
    ];

    /// Returns the wire name of the column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Price => "price",
            Self::Category => "category",
            Self::CreatedAt => "created_at",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "category" => Ok(Self::Category),
            "created_at" => Ok(Self::CreatedAt),
            other => Err(DomainError::InvalidSortField(other.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending (default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Returns the wire name of the direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(DomainError::InvalidSortOrder(other.to_string())),
        }
    }
}

/// Current filter and sort selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Free-text search, empty when unset.
    pub search: String,
    /// Category filter, empty for all categories.
    pub category: String,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// Sort column.
    pub sort_by: SortField,
    /// Sort direction.
    pub order: SortOrder,
}

impl FilterState {
    /// Sets one filter from its input text.
    ///
    /// Returns whether the stored value changed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if a price bound is not a decimal;
    /// the state is left untouched.
    pub fn set(&mut self, key: FilterKey, value: &str) -> DomainResult<bool> {
        match key {
            FilterKey::Search => Ok(replace(&mut self.search, value.to_string())),
            FilterKey::Category => Ok(replace(&mut self.category, value.to_string())),
            FilterKey::MinPrice => {
                let bound = parse_price_bound(value)?;
                Ok(replace(&mut self.min_price, bound))
            }
            FilterKey::MaxPrice => {
                let bound = parse_price_bound(value)?;
                Ok(replace(&mut self.max_price, bound))
            }
        }
    }

    /// Applies the column-header toggle: the active column flips its
    /// direction, any other column becomes active in ascending order.
    pub fn toggle_sort(&mut self, column: SortField) {
        if self.sort_by == column {
            self.order = self.order.flipped();
        } else {
            self.sort_by = column;
            self.order = SortOrder::Asc;
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Parses a price bound input; blank input clears the bound.
///
/// # Errors
///
/// Returns `DomainError::InvalidPrice` for non-decimal input.
pub fn parse_price_bound(value: &str) -> DomainResult<Option<Decimal>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(trimmed)
        .map(Some)
        .map_err(|_| DomainError::InvalidPrice(trimmed.to_string()))
}
