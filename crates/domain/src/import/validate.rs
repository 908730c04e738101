//! Per-row validation of normalized import rows.

use rust_decimal::Decimal;
use thiserror::Error;

use super::cell::CellValue;
use super::header::{CanonicalField, NormalizedRow};
use crate::product::CanonicalRecord;

/// Reason a row is rejected: missing or blank name.
pub const NAME_REQUIRED: &str = "Name is required";
/// Reason a row is rejected: price missing, non-numeric or not positive.
pub const PRICE_REQUIRED: &str = "Valid price is required";
/// Reason a row is rejected: missing or blank category.
pub const CATEGORY_REQUIRED: &str = "Category is required";

/// Validation failure of one import row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Row {row_number}: {}", .messages.join(", "))]
pub struct RowError {
    /// 1-based spreadsheet row number; the header occupies row 1.
    pub row_number: usize,
    /// Failure reasons in field order.
    pub messages: Vec<&'static str>,
}

/// Validates a normalized row and formats it into a canonical record.
///
/// # Errors
///
/// Returns a [`RowError`] listing every failing field, in the order name,
/// price, category.
pub fn validate_row(row: &NormalizedRow) -> Result<CanonicalRecord, RowError> {
    let text = |field: CanonicalField| row.get(field).and_then(CellValue::as_text);

    let name = text(CanonicalField::Name);
    let price = row
        .get(CanonicalField::Price)
        .and_then(CellValue::as_decimal)
        .filter(|price| *price > Decimal::ZERO);
    let category = text(CanonicalField::Category);

    match (name, price, category) {
        (Some(name), Some(price), Some(category)) => Ok(CanonicalRecord {
            name,
            price,
            category,
            description: text(CanonicalField::Description).unwrap_or_default(),
        }),
        (name, price, category) => {
            let mut messages = Vec::with_capacity(3);
            if name.is_none() {
                messages.push(NAME_REQUIRED);
            }
            if price.is_none() {
                messages.push(PRICE_REQUIRED);
            }
            if category.is_none() {
                messages.push(CATEGORY_REQUIRED);
            }
            Err(RowError {
                row_number: row.index + 2,
                messages,
            })
        }
    }
}
