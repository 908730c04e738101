//! Tabular file reader - CSV, TSV and JSON product sheets
//!
//! Turns the bytes of a selected file into raw rows for the import pipeline.
//! The first CSV line (or the keys of each JSON object) are the headers.

use std::path::Path;

use catalog_application::{SheetError, SheetReader};
use catalog_domain::{CellValue, RawRow};
use indexmap::IndexMap;

/// Default maximum file size (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0";

/// Layouts the reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Delimited text with the given delimiter.
    Delimited(u8),
    /// JSON array of objects.
    Json,
}

/// Reads delimited text and JSON sheets.
#[derive(Debug, Clone)]
pub struct TabularSheetReader {
    max_file_size: u64,
}

impl Default for TabularSheetReader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl TabularSheetReader {
    /// Creates a reader with the default size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reader rejecting files above `max_file_size` bytes.
    #[must_use]
    pub const fn with_max_file_size(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Reads a file from disk, checking its size before loading it.
    /// Returns the file name and contents.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::TooLarge` or `SheetError::Io`.
    pub async fn load(&self, path: &Path) -> Result<(String, Vec<u8>), SheetError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| SheetError::Io(format!("{}: {e}", path.display())))?;
        self.check_size(metadata.len())?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SheetError::Io(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok((file_name, bytes))
    }

    fn check_size(&self, size: u64) -> Result<(), SheetError> {
        if size > self.max_file_size {
            return Err(SheetError::TooLarge {
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Detects the layout from the file name and the decoded text.
    #[must_use]
    pub fn detect_format(file_name: &str, text: &str) -> SheetFormat {
        let extension = Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        match extension.as_deref() {
            Some("json") => return SheetFormat::Json,
            Some("tsv") => return SheetFormat::Delimited(b'\t'),
            _ => {}
        }
        if text.trim_start().starts_with('[') {
            return SheetFormat::Json;
        }
        SheetFormat::Delimited(sniff_delimiter(text))
    }

    fn read_delimited(text: &str, delimiter: u8) -> Result<Vec<RawRow>, SheetError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(text.as_bytes());
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| SheetError::Malformed(e.to_string()))?
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| SheetError::Malformed(e.to_string()))?;
            let cells = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.clone(), CellValue::from(value)))
                .collect();
            push_row(&mut rows, index, cells);
        }
        Ok(rows)
    }

    fn read_json(text: &str) -> Result<Vec<RawRow>, SheetError> {
        let objects: Vec<IndexMap<String, serde_json::Value>> = serde_json::from_str(text)
            .map_err(|e| SheetError::Malformed(format!("expected a JSON array of objects: {e}")))?;
        let mut rows = Vec::with_capacity(objects.len());
        for (index, object) in objects.into_iter().enumerate() {
            let cells = object
                .into_iter()
                .map(|(header, value)| (header, json_cell(value)))
                .collect();
            push_row(&mut rows, index, cells);
        }
        Ok(rows)
    }
}

impl SheetReader for TabularSheetReader {
    fn read(&self, file_name: &str, bytes: &[u8]) -> Result<Vec<RawRow>, SheetError> {
        self.check_size(bytes.len() as u64)?;

        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            return Err(SheetError::Unsupported(
                "spreadsheet workbooks are not supported; save the sheet as CSV".to_string(),
            ));
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| SheetError::Unsupported(format!("file is not UTF-8 text: {e}")))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let format = Self::detect_format(file_name, text);
        tracing::debug!(file_name, ?format, size = bytes.len(), "reading sheet");
        match format {
            SheetFormat::Json => Self::read_json(text),
            SheetFormat::Delimited(delimiter) => Self::read_delimited(text, delimiter),
        }
    }
}

/// Keeps non-blank rows under their record position, so row numbers in
/// validation messages still point at the right line of the file.
fn push_row(rows: &mut Vec<RawRow>, index: usize, cells: Vec<(String, CellValue)>) {
    let row = RawRow::new(index, cells);
    if !row.is_blank() {
        rows.push(row);
    }
}

fn json_cell(value: serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Empty,
        serde_json::Value::Bool(b) => CellValue::Bool(b),
        serde_json::Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
        serde_json::Value::String(s) if s.is_empty() => CellValue::Empty,
        serde_json::Value::String(s) => CellValue::Text(s),
        other => CellValue::Text(other.to_string()),
    }
}

/// Picks the most frequent of `,`, `;` and tab on the header line.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    [b',', b';', b'\t']
        .into_iter()
        .map(|d| (d, header.bytes().filter(|b| *b == d).count()))
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map_or(b',', |(d, _)| d)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read(file_name: &str, content: &str) -> Result<Vec<RawRow>, SheetError> {
        TabularSheetReader::new().read(file_name, content.as_bytes())
    }

    #[test]
    fn test_csv_rows_keep_header_order() {
        let rows = read(
            "products.csv",
            "Product Name,Price,Category\nDesk,120,Home & Garden\n\nLamp,35.5,Home & Garden\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].index, 1);
        assert_eq!(
            rows[0].cells[0],
            ("Product Name".to_string(), CellValue::from("Desk"))
        );
    }

    #[test]
    fn test_delimiter_is_sniffed() {
        let rows = read("export.txt", "name;price;category\n\"Pen, blue\";1,20;Other\n").unwrap();
        assert_eq!(rows[0].cells[0].1, CellValue::from("Pen, blue"));
        assert_eq!(
            TabularSheetReader::detect_format("x.tsv", "a,b"),
            SheetFormat::Delimited(b'\t')
        );
    }

    #[test]
    fn test_blank_cells_and_rows() {
        let rows = read("p.csv", "name,price,category\n,,\nPen,,Other\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].cells[1].1, CellValue::Empty);
    }

    #[test]
    fn test_blank_record_keeps_later_positions() {
        let rows = read("p.csv", "name,price,category
A,1,X
,,
B,2,Y
").unwrap();
        let indexes: Vec<usize> = rows.iter().map(|row| row.index).collect();
        assert_eq!(indexes, vec![0, 2]);
        assert_eq!(rows[1].cells[0].1, CellValue::from("B"));

        let rows = read(
            "p.json",
            r#"[{"name": null, "price": ""}, {"name": "Pen", "price": 1}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 1);
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        assert!(read("p.csv", "name,price,category\n").unwrap().is_empty());
        assert!(read("p.csv", "").unwrap().is_empty());
    }

    #[test]
    fn test_ragged_csv_is_malformed() {
        let err = read("p.csv", "name,price,category\nPen,1\n").unwrap_err();
        assert!(matches!(err, SheetError::Malformed(_)));
    }

    #[test]
    fn test_json_array_of_objects() {
        let rows = read(
            "products.json",
            r#"[{"Name": "Pen", "Price": 1.5, "Category": "Other", "Stock": null},
               {"Name": "Mug", "Price": "7", "Category": "Home", "Fragile": true}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells[0].0, "Name");
        assert_eq!(rows[0].cells[1].1, CellValue::Number(1.5));
        assert_eq!(rows[0].cells[3].1, CellValue::Empty);
        assert_eq!(rows[1].cells[3].1, CellValue::Bool(true));
    }

    #[test]
    fn test_json_must_be_array_of_objects() {
        let err = read("products.json", r#"{"name": "Pen"}"#).unwrap_err();
        assert!(err.to_string().contains("expected a JSON array of objects"));
        assert!(read("products.json", "[1, 2]").is_err());
    }

    #[test]
    fn test_workbooks_and_binary_are_unsupported() {
        let reader = TabularSheetReader::new();
        let err = reader.read("products.xlsx", b"PK\x03\x04rest").unwrap_err();
        assert!(matches!(err, SheetError::Unsupported(_)));
        let err = reader.read("products.csv", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(err.to_string().contains("not UTF-8"));
    }

    #[test]
    fn test_size_limit() {
        let reader = TabularSheetReader::with_max_file_size(8);
        let err = reader.read("p.csv", b"name,price,category").unwrap_err();
        assert_eq!(err, SheetError::TooLarge { size: 19, limit: 8 });
    }

    #[tokio::test]
    async fn test_load_checks_size_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        std::fs::write(&path, "name,price,category\nPen,1,Other\n").unwrap();

        let (name, bytes) = TabularSheetReader::new().load(&path).await.unwrap();
        assert_eq!(name, "products.csv");
        assert_eq!(bytes.len(), 32);

        let small = TabularSheetReader::with_max_file_size(4);
        assert!(matches!(
            small.load(&path).await,
            Err(SheetError::TooLarge { size: 32, .. })
        ));
        assert!(matches!(
            small.load(&dir.path().join("missing.csv")).await,
            Err(SheetError::Io(_))
        ));
    }
}
