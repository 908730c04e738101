//! Import products use case
//!
//! Drives one import dialog: file selection and preview, then processing and
//! bulk submission of the valid rows.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use catalog_domain::{HeaderRules, PREVIEW_ROWS, RawRow, UploadStats, process_rows};
use parking_lot::Mutex;
use thiserror::Error;

use super::mutations::{MutationCoordinator, MutationError};
use crate::ports::{ProductGateway, SheetError, SheetReader};

/// Reported when uploading before a file was selected.
pub const NO_FILE_SELECTED: &str = "Please select a file first.";

/// Errors that can occur during an import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// No file has been selected.
    #[error("Please select a file first.")]
    NoFile,

    /// The selected file could not be parsed.
    #[error("{0}")]
    Parse(#[from] SheetError),

    /// No row passed validation; nothing was submitted.
    #[error("No valid products found to import.")]
    NoValidRows {
        /// Row errors followed by the terminal condition.
        errors: Vec<String>,
    },

    /// The bulk submission failed.
    #[error("{0}")]
    Submit(MutationError),

    /// An upload is already being processed.
    #[error("an import is already in progress")]
    Busy,
}

/// Result of a submitted import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Submission counts.
    pub stats: UploadStats,
    /// Errors of rows left out of the submission.
    pub row_errors: Vec<String>,
}

/// Observable state of the import dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSnapshot {
    /// Name of the selected file.
    pub file_name: Option<String>,
    /// First rows of the selected file.
    pub preview: Vec<RawRow>,
    /// Messages to display, in order.
    pub errors: Vec<String>,
    /// Counts of the last submission.
    pub stats: Option<UploadStats>,
    /// Whether an upload is being processed.
    pub processing: bool,
}

#[derive(Debug, Default)]
struct Selection {
    file_name: Option<String>,
    rows: Vec<RawRow>,
    parse_error: Option<SheetError>,
    errors: Vec<String>,
    stats: Option<UploadStats>,
}

/// Clears the processing flag when an upload ends, however it ends.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// State of one import dialog.
pub struct ImportSession<R: SheetReader> {
    reader: R,
    rules: HeaderRules,
    selection: Mutex<Selection>,
    generation: AtomicU64,
    processing: AtomicBool,
}

impl<R: SheetReader> ImportSession<R> {
    /// Creates an import session with no file selected.
    pub fn new(reader: R, rules: HeaderRules) -> Self {
        Self {
            reader,
            rules,
            selection: Mutex::new(Selection::default()),
            generation: AtomicU64::new(0),
            processing: AtomicBool::new(false),
        }
    }

    /// Returns the dialog state.
    #[must_use]
    pub fn snapshot(&self) -> ImportSnapshot {
        let selection = self.selection.lock();
        ImportSnapshot {
            file_name: selection.file_name.clone(),
            preview: selection.rows.iter().take(PREVIEW_ROWS).cloned().collect(),
            errors: selection.errors.clone(),
            stats: selection.stats,
            processing: self.processing.load(Ordering::SeqCst),
        }
    }

    /// Selects a file, resetting all previous state, and parses it for the
    /// preview. Returns the number of data rows.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Parse` if the file cannot be parsed; the file
    /// stays selected and the message is shown.
    pub fn select_file(&self, file_name: &str, bytes: &[u8]) -> Result<usize, ImportError> {
        let parsed = self.reader.read(file_name, bytes);
        let mut selection = self.selection.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *selection = Selection {
            file_name: Some(file_name.to_string()),
            ..Selection::default()
        };
        match parsed {
            Ok(rows) => {
                tracing::debug!(file_name, rows = rows.len(), "import file parsed");
                let count = rows.len();
                selection.rows = rows;
                Ok(count)
            }
            Err(error) => {
                tracing::warn!(file_name, %error, "import file rejected");
                selection.errors = vec![error.to_string()];
                selection.parse_error = Some(error.clone());
                Err(ImportError::Parse(error))
            }
        }
    }

    /// Deselects the file and resets all state.
    pub fn clear(&self) {
        let mut selection = self.selection.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *selection = Selection::default();
    }

    /// Runs `apply` on the selection unless it was replaced or cleared since
    /// `generation` was read.
    fn write_back(&self, generation: u64, apply: impl FnOnce(&mut Selection)) {
        let mut selection = self.selection.lock();
        if self.generation.load(Ordering::SeqCst) == generation {
            apply(&mut selection);
        } else {
            tracing::debug!(generation, "selection changed during upload, results not shown");
        }
    }

    /// Validates the selected rows and submits the valid ones in one batch.
    ///
    /// # Errors
    ///
    /// - `ImportError::Busy` while another upload is processed
    /// - `ImportError::NoFile` / `ImportError::Parse` when there is nothing to read
    /// - `ImportError::NoValidRows` when every row failed validation
    /// - `ImportError::Submit` when the service refused the batch
    pub async fn upload<G: ProductGateway>(
        &self,
        coordinator: &MutationCoordinator<G>,
    ) -> Result<ImportReport, ImportError> {
        if self.processing.swap(true, Ordering::SeqCst) {
            return Err(ImportError::Busy);
        }
        let _guard = ProcessingGuard(&self.processing);

        let (generation, outcome) = {
            let mut selection = self.selection.lock();
            let generation = self.generation.load(Ordering::SeqCst);
            selection.stats = None;
            if selection.file_name.is_none() {
                selection.errors = vec![NO_FILE_SELECTED.to_string()];
                return Err(ImportError::NoFile);
            }
            if let Some(error) = selection.parse_error.clone() {
                selection.errors = vec![error.to_string()];
                return Err(ImportError::Parse(error));
            }
            let outcome = process_rows(&selection.rows, &self.rules);
            selection.errors.clone_from(&outcome.error_messages);
            (generation, outcome)
        };

        if !outcome.is_submittable() {
            return Err(ImportError::NoValidRows {
                errors: outcome.error_messages,
            });
        }

        match coordinator.bulk_import(&outcome.valid_records).await {
            Ok(accepted) => {
                let stats = UploadStats::from_count(outcome.valid_records.len(), accepted);
                self.write_back(generation, |selection| selection.stats = Some(stats));
                Ok(ImportReport {
                    stats,
                    row_errors: outcome.error_messages,
                })
            }
            Err(error) => {
                let message = error.to_string();
                self.write_back(generation, |selection| selection.errors.push(message));
                Err(ImportError::Submit(error))
            }
        }
    }
}
