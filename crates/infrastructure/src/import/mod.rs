//! Import file readers.

mod sheet_reader;

pub use sheet_reader::{DEFAULT_MAX_FILE_SIZE, SheetFormat, TabularSheetReader};
