//! Category list shown in filters and forms.

/// Categories offered when the service has none or cannot be reached.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Electronics",
    "Clothing",
    "Books",
    "Home & Garden",
    "Sports",
    "Other",
];

/// Returns the default categories as owned strings.
#[must_use]
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect()
}

/// Merges the defaults with categories reported by the service.
///
/// Defaults come first, followed by unseen remote categories in their
/// original order. Entries are trimmed; blanks and exact duplicates are
/// dropped.
#[must_use]
pub fn merge_categories<S: AsRef<str>>(remote: &[S]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(DEFAULT_CATEGORIES.len() + remote.len());
    let candidates = DEFAULT_CATEGORIES
        .iter()
        .copied()
        .chain(remote.iter().map(AsRef::as_ref));
    for candidate in candidates {
        let candidate = candidate.trim();
        if !candidate.is_empty() && !merged.iter().any(|c| c == candidate) {
            merged.push(candidate.to_string());
        }
    }
    merged
}
