//! Grove Response Assembler
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::mapper::Record;
use grove_common::ScanScope;
use serde::Serialize;

/// One page of records as returned to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    pub items: Vec<Record>,
    pub page_size: usize,
    pub returned_count: usize,
    pub has_more: bool,
    pub next_cursor: Option<String>,
    pub scope: ScanScope,
}

impl RecordPage {
    /// `has_more` follows the cursor: a page is continuable exactly when a
    /// cursor was produced, regardless of how many items survived filtering.
    pub fn assemble(
        items: Vec<Record>,
        page_size: usize,
        next_cursor: Option<String>,
        scope: ScanScope,
    ) -> Self {
        Self {
            returned_count: items.len(),
            has_more: next_cursor.is_some(),
            items,
            page_size,
            next_cursor,
            scope,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
