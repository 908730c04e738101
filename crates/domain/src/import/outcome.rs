//! Aggregation of validated rows and the post-submission report.

use serde::{Deserialize, Serialize};

use super::cell::RawRow;
use super::header::HeaderRules;
use super::validate::validate_row;
use crate::product::CanonicalRecord;

/// Terminal condition reported when nothing in the file can be imported.
pub const NO_VALID_ROWS: &str = "No valid products found to import.";

/// Result of running the parse output through normalization and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Records ready for submission, in file order.
    pub valid_records: Vec<CanonicalRecord>,
    /// Rendered row errors, followed by [`NO_VALID_ROWS`] when applicable.
    pub error_messages: Vec<String>,
}

impl ImportOutcome {
    /// Whether there is anything to submit.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_submittable(&self) -> bool {
        !self.valid_records.is_empty()
    }
}

/// Normalizes and validates every row, collecting records and row errors.
///
/// When no row is valid the [`NO_VALID_ROWS`] condition is appended after
/// the row errors.
#[must_use]
pub fn process_rows(rows: &[RawRow], rules: &HeaderRules) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();
    for row in rows {
        match validate_row(&rules.normalize(row)) {
            Ok(record) => outcome.valid_records.push(record),
            Err(err) => outcome.error_messages.push(err.to_string()),
        }
    }
    if outcome.valid_records.is_empty() {
        outcome.error_messages.push(NO_VALID_ROWS.to_string());
    }
    outcome
}

/// Counts reported after a bulk submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStats {
    /// Records submitted.
    pub total: usize,
    /// Records the service accepted.
    pub success: usize,
    /// Records the service did not accept.
    pub failed: usize,
}

impl UploadStats {
    /// Derives the stats from the number submitted and the accepted count.
    /// An accepted count above `total` is capped.
    #[must_use]
    pub fn from_count(total: usize, accepted: u64) -> Self {
        let success = usize::try_from(accepted).unwrap_or(usize::MAX).min(total);
        Self {
            total,
            success,
            failed: total - success,
        }
    }

    /// Summary lines as shown after an import.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!("Successfully imported: {} products", self.success)];
        if self.failed > 0 {
            lines.push(format!("Failed to import: {} products", self.failed));
        }
        lines.push(format!("Total processed: {} products", self.total));
        lines
    }
}
