//! Grove Config - Record Query Configuration
//!
//! Configuration for the record query engine: where records live, how pages
//! are sized, and which auxiliary collections feed the derived stats. Every
//! field has a serde default so partial TOML sections deserialize cleanly.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::types::ScanScope;
use serde::{Deserialize, Serialize};

// =============================================================================
// Records Configuration
// =============================================================================

/// Configuration for record queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Reserved collection name shared by every records collection.
    pub collection: String,
    /// Document path the single-scope collection hangs under.
    pub base_path: String,
    /// Optional segment inserted between the base path and the collection.
    pub sub_path: Option<String>,
    pub default_scope: ScanScope,
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Hard ceiling on pages fetched by one accumulate-all request.
    pub max_pages: usize,
    pub stats: StatsConfig,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            collection: "users".to_string(),
            base_path: "orgs/default".to_string(),
            sub_path: None,
            default_scope: ScanScope::Group,
            default_page_size: 25,
            max_page_size: 100,
            max_pages: 500,
            stats: StatsConfig::default(),
        }
    }
}

impl RecordsConfig {
    /// Collection path used by single-scope scans when the caller does not
    /// override it.
    pub fn single_collection_path(&self) -> String {
        let mut segments: Vec<&str> = Vec::new();
        segments.extend(self.base_path.split('/').filter(|s| !s.is_empty()));
        if let Some(ref sub) = self.sub_path {
            segments.extend(sub.split('/').filter(|s| !s.is_empty()));
        }
        segments.push(&self.collection);
        segments.join("/")
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_sub_path(mut self, sub_path: Option<String>) -> Self {
        self.sub_path = sub_path;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

// =============================================================================
// Stats Configuration
// =============================================================================

/// Auxiliary collections and fields used to derive per-record stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub schedules_collection: String,
    /// Multi-value field on schedules listing member record ids.
    pub schedule_members_field: String,
    pub history_collection: String,
    pub history_owner_field: String,
    pub history_status_field: String,
    pub pending_status: String,
    /// Fan-out latency above this is logged as slow.
    pub slow_threshold_ms: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            schedules_collection: "schedules".to_string(),
            schedule_members_field: "participants".to_string(),
            history_collection: "history".to_string(),
            history_owner_field: "userId".to_string(),
            history_status_field: "status".to_string(),
            pending_status: "pending".to_string(),
            slow_threshold_ms: 500,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
