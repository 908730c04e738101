//! The tabular import pipeline, minus the file parsing itself:
//! header normalization, row validation and aggregation.

mod cell;
mod header;
mod outcome;
mod validate;

pub use cell::{CellValue, RawRow};
pub use header::{CanonicalField, HeaderRule, HeaderRules, NormalizedRow};
pub use outcome::{ImportOutcome, NO_VALID_ROWS, UploadStats, process_rows};
pub use validate::{CATEGORY_REQUIRED, NAME_REQUIRED, PRICE_REQUIRED, RowError, validate_row};

/// Number of parsed rows shown before an import is submitted.
pub const PREVIEW_ROWS: usize = 3;
