//! The query-state controller.
//!
//! Owns filter, sort and pagination for the product list. All changes go
//! through the methods below so that page resets and clamping are applied
//! consistently.

use super::filter::{FilterKey, FilterState, SortField, SortOrder};
use super::pagination::{PageLimit, PaginationState, total_pages_for};
use super::params::ListParams;
use crate::error::DomainResult;

/// Behaviour switches of the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryPolicy {
    /// Whether a sort change sends the user back to page 1.
    /// Off by default so a re-sort keeps the current page.
    pub reset_page_on_sort: bool,
}

/// The persisted part of the controller: what a shareable link carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// Filter and sort selection.
    pub filters: FilterState,
    /// Current page, 1-based.
    pub page: u32,
    /// Rows per page.
    pub limit: PageLimit,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            page: 1,
            limit: PageLimit::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Totals {
    total: u64,
    total_pages: u32,
}

/// Filter, sort and pagination state of the product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryController {
    state: QueryState,
    totals: Option<Totals>,
    policy: QueryPolicy,
}

impl QueryController {
    /// Creates a controller at its defaults.
    #[must_use]
    pub fn new(policy: QueryPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Restores a controller from its persisted representation. Omitted
    /// keys take their defaults; totals are unknown until the first load.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuery` for undecodable values and
    /// `DomainError::InvalidLimit` for an unsupported page size.
    pub fn deserialize(external: &str, policy: QueryPolicy) -> DomainResult<Self> {
        let params = ListParams::from_query_string(external)?;
        let limit = params
            .limit
            .map_or(Ok(PageLimit::default()), PageLimit::try_from)?;
        let filters = FilterState {
            search: params.search.unwrap_or_default(),
            category: params.category.unwrap_or_default(),
            min_price: params.min_price,
            max_price: params.max_price,
            sort_by: params.sort_by.unwrap_or_default(),
            order: params.order.unwrap_or_default(),
        };
        Ok(Self {
            state: QueryState {
                filters,
                page: params.page.unwrap_or(1).max(1),
                limit,
            },
            totals: None,
            policy,
        })
    }

    /// Encodes the persisted state, emitting only non-default keys.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuery` if encoding fails.
    pub fn serialize(&self) -> DomainResult<String> {
        self.to_request_params().to_query_string()
    }

    /// Returns the persisted part of the state.
    #[must_use]
    pub const fn query_state(&self) -> &QueryState {
        &self.state
    }

    /// Returns the filter and sort selection.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.state.filters
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> QueryPolicy {
        self.policy
    }

    /// Returns the pagination as displayed; totals read 0 before the first load.
    #[must_use]
    pub fn pagination(&self) -> PaginationState {
        let totals = self.totals.unwrap_or(Totals {
            total: 0,
            total_pages: 0,
        });
        PaginationState {
            page: self.state.page,
            limit: self.state.limit,
            total: totals.total,
            total_pages: totals.total_pages,
        }
    }

    /// Updates one filter. A changed value moves back to page 1; setting
    /// the current value again changes nothing.
    ///
    /// Returns whether the filter changed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` for a non-decimal price bound.
    pub fn set_filter(&mut self, key: FilterKey, value: &str) -> DomainResult<bool> {
        let changed = self.state.filters.set(key, value)?;
        if changed {
            self.state.page = 1;
        }
        Ok(changed)
    }

    /// Clicks a column header: flips the direction of the active column or
    /// sorts ascending by a new one.
    pub fn set_sort(&mut self, column: SortField) {
        self.state.filters.toggle_sort(column);
        if self.policy.reset_page_on_sort {
            self.state.page = 1;
        }
    }

    /// Returns the current sort column and direction.
    #[must_use]
    pub const fn sort(&self) -> (SortField, SortOrder) {
        (self.state.filters.sort_by, self.state.filters.order)
    }

    /// Changes the page size and moves back to page 1.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLimit` for an unsupported size.
    pub fn set_limit(&mut self, limit: u32) -> DomainResult<()> {
        let limit = PageLimit::try_from(limit)?;
        self.state.limit = limit;
        self.state.page = 1;
        if let Some(totals) = self.totals {
            self.totals = Some(Totals {
                total: totals.total,
                total_pages: total_pages_for(totals.total, limit),
            });
        }
        Ok(())
    }

    /// Moves to a page, clamped to the valid range. Before the first load
    /// only the lower bound is known.
    pub fn set_page(&mut self, page: u32) {
        self.state.page = self.clamp_page(page);
    }

    /// Records the total reported by a list response, recomputing the page
    /// count and clamping the current page into range.
    ///
    /// Returns true if the current page had to move.
    pub fn apply_totals(&mut self, total: u64) -> bool {
        self.totals = Some(Totals {
            total,
            total_pages: total_pages_for(total, self.state.limit),
        });
        let clamped = self.clamp_page(self.state.page);
        let moved = clamped != self.state.page;
        self.state.page = clamped;
        moved
    }

    fn clamp_page(&self, page: u32) -> u32 {
        let page = page.max(1);
        match self.totals {
            Some(totals) => page.min(totals.total_pages.max(1)),
            None => page,
        }
    }

    /// Builds the list request, omitting every field at its default.
    #[must_use]
    pub fn to_request_params(&self) -> ListParams {
        let filters = &self.state.filters;
        ListParams {
            page: (self.state.page != 1).then_some(self.state.page),
            limit: (self.state.limit != PageLimit::default()).then(|| self.state.limit.get()),
            search: non_empty(&filters.search),
            category: non_empty(&filters.category),
            min_price: filters.min_price,
            max_price: filters.max_price,
            sort_by: (filters.sort_by != SortField::default()).then_some(filters.sort_by),
            order: (filters.order != SortOrder::default()).then_some(filters.order),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
