//! Header normalization: mapping free-form column headers onto product fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::{CellValue, RawRow};

/// Product fields an import column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalField {
    /// Product name.
    Name,
    /// Unit price.
    Price,
    /// Category label.
    Category,
    /// Description.
    Description,
}

impl CanonicalField {
    const fn slot(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Price => 1,
            Self::Category => 2,
            Self::Description => 3,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Category => "category",
            Self::Description => "description",
        };
        f.write_str(name)
    }
}

/// A substring rule: headers containing `contains` feed `field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRule {
    /// Case-insensitive substring to look for.
    pub contains: String,
    /// Field fed by matching headers.
    pub field: CanonicalField,
}

impl HeaderRule {
    /// Creates a rule; the needle is stored lower-cased and trimmed.
    #[must_use]
    pub fn new(contains: &str, field: CanonicalField) -> Self {
        Self {
            contains: contains.trim().to_lowercase(),
            field,
        }
    }

    fn matches(&self, key: &str) -> bool {
        !self.contains.is_empty() && key.contains(self.contains.as_str())
    }
}

/// Ordered header rules. The first matching rule decides a header's field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRules {
    rules: Vec<HeaderRule>,
}

impl Default for HeaderRules {
    fn default() -> Self {
        Self {
            rules: vec![
                HeaderRule::new("name", CanonicalField::Name),
                HeaderRule::new("price", CanonicalField::Price),
                HeaderRule::new("category", CanonicalField::Category),
                HeaderRule::new("description", CanonicalField::Description),
            ],
        }
    }
}

impl HeaderRules {
    /// Default rules followed by the given synonyms, in order.
    #[must_use]
    pub fn with_synonyms(synonyms: impl IntoIterator<Item = HeaderRule>) -> Self {
        let mut rules = Self::default();
        rules.rules.extend(
            synonyms
                .into_iter()
                .map(|rule| HeaderRule::new(&rule.contains, rule.field)),
        );
        rules
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[HeaderRule] {
        &self.rules
    }

    /// Maps a header to its field, if any rule matches.
    #[must_use]
    pub fn field_for(&self, header: &str) -> Option<CanonicalField> {
        let key = header.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&key))
            .map(|rule| rule.field)
    }

    /// Normalizes one row. The first header mapped to a field wins; headers
    /// that match nothing are dropped.
    #[must_use]
    pub fn normalize(&self, row: &RawRow) -> NormalizedRow {
        let mut normalized = NormalizedRow {
            index: row.index,
            slots: Default::default(),
        };
        for (header, cell) in &row.cells {
            if let Some(field) = self.field_for(header) {
                let slot = &mut normalized.slots[field.slot()];
                if slot.is_none() {
                    *slot = Some(cell.clone());
                }
            }
        }
        normalized
    }
}

/// A row keyed by product field instead of by header.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    /// 0-based data-row index carried over from the raw row.
    pub index: usize,
    slots: [Option<CellValue>; 4],
}

impl NormalizedRow {
    /// Returns the cell feeding `field`, if a header mapped to it.
    #[must_use]
    pub fn get(&self, field: CanonicalField) -> Option<&CellValue> {
        self.slots[field.slot()].as_ref()
    }
}
