//! Page size and page bookkeeping.

use std::fmt;

use crate::error::DomainError;

/// Supported page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageLimit {
    /// 5 rows per page.
    Five,
    /// 10 rows per page (default).
    #[default]
    Ten,
    /// 25 rows per page.
    TwentyFive,
    /// 50 rows per page.
    Fifty,
}

impl PageLimit {
    /// All page sizes in selector order.
    pub const ALL: [Self; 4] = [Self::Five, Self::Ten, Self::TwentyFive, Self::Fifty];

    /// Returns the number of rows per page.
    #[must_use]
    pub const fn get(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for PageLimit {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|limit| limit.get() == value)
            .ok_or(DomainError::InvalidLimit(value))
    }
}

impl fmt::Display for PageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Number of pages needed for `total` rows; zero rows means zero pages.
#[must_use]
pub fn total_pages_for(total: u64, limit: PageLimit) -> u32 {
    let pages = total.div_ceil(u64::from(limit.get()));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Pagination as displayed under the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// Current page, 1-based.
    pub page: u32,
    /// Rows per page.
    pub limit: PageLimit,
    /// Total matching rows, 0 until the first load.
    pub total: u64,
    /// Total pages, 0 until the first load or when nothing matches.
    pub total_pages: u32,
}

impl PaginationState {
    /// 1-based index of the first row on the page, 0 when the page is empty.
    #[must_use]
    pub fn first_row(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        u64::from(self.page - 1) * u64::from(self.limit.get()) + 1
    }

    /// 1-based index of the last row on the page.
    #[must_use]
    pub fn last_row(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.limit.get())).min(self.total)
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
