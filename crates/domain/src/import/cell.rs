//! Raw tabular rows as produced by a sheet reader.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// A single cell value of a parsed sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Blank cell or JSON `null`.
    #[default]
    Empty,
    /// Text cell.
    Text(String),
    /// Numeric cell.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
}

impl CellValue {
    /// Returns the trimmed textual form of the cell, `None` when blank.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            Self::Empty => return None,
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    /// Reads the cell as a decimal. Numbers must be finite; text must parse
    /// as a decimal after trimming. Booleans and blanks never do.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) if n.is_finite() => Decimal::from_f64(*n),
            Self::Text(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

/// One data row: `(header, cell)` pairs in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    /// 0-based position among data records (the header row is not counted).
    /// Skipped blank records keep their position.
    pub index: usize,
    /// Cells keyed by their column header.
    pub cells: Vec<(String, CellValue)>,
}

impl RawRow {
    /// Creates a row from its cells.
    #[must_use]
    pub const fn new(index: usize, cells: Vec<(String, CellValue)>) -> Self {
        Self { index, cells }
    }

    /// Returns true if every cell is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, cell)| cell.as_text().is_none())
    }
}
