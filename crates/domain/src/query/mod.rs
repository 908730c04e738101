//! Filter, sort and pagination of the product list, and their
//! query-string representation.

mod controller;
mod filter;
mod pagination;
mod params;

pub use controller::{QueryController, QueryPolicy, QueryState};
pub use filter::{FilterKey, FilterState, SortField, SortOrder, parse_price_bound};
pub use pagination::{PageLimit, PaginationState, total_pages_for};
pub use params::ListParams;
