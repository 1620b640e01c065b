//! Grove Post-filter
//!
//! Case-insensitive substring search over already-fetched records. The store
//! cannot substring-match arbitrary fields, so this runs after pagination:
//! a filtered page may hold fewer than `pageSize` items while more data
//! exists, and `hasMore` keeps reflecting the unfiltered page.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::mapper::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    /// Build a filter from raw search text. Blank input means no filter.
    pub fn new(raw: Option<&str>) -> Option<Self> {
        let needle = raw?.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Some(Self { needle })
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Whether any searched field contains the needle.
    pub fn matches(&self, record: &Record) -> bool {
        [
            record.email.as_deref(),
            record.display_name.as_deref(),
            record.phone.as_deref(),
            record.source.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&self.needle))
    }

    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
