//! Tabular file reader port

use catalog_domain::RawRow;
use thiserror::Error;

/// Errors raised while turning file bytes into rows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// The file is larger than the configured maximum.
    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    TooLarge {
        /// Size of the file.
        size: u64,
        /// Configured limit.
        limit: u64,
    },

    /// The file format is not one the reader understands.
    #[error("unsupported file format: {0}")]
    Unsupported(String),

    /// The file looked supported but could not be parsed.
    #[error("could not parse file: {0}")]
    Malformed(String),

    /// The file could not be read.
    #[error("could not read file: {0}")]
    Io(String),
}

/// Port for parsing a selected file into raw rows.
///
/// The first row of the file is the header row; every returned row is a
/// data row carrying its 0-based index.
pub trait SheetReader: Send + Sync {
    /// Parses file contents. `file_name` is only used to pick a format.
    ///
    /// # Errors
    ///
    /// Returns a [`SheetError`] for unsupported or malformed input.
    fn read(&self, file_name: &str, bytes: &[u8]) -> Result<Vec<RawRow>, SheetError>;
}
