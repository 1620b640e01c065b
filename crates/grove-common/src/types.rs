//! Grove Types - Shared Data Types
//!
//! Types that cross crate boundaries: the configuration layer picks a default
//! scan scope, and the record query engine resolves one per request.
//!
//! @version 0.1.0
//! @author Grove Development Team

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Scan Scope
// =============================================================================

/// Where records are read from for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanScope {
    /// One fixed collection path.
    Single,
    /// Every collection sharing the records collection name.
    #[default]
    Group,
}

impl ScanScope {
    /// Parse a caller-supplied scope, returning None for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "group" => Some(Self::Group),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for ScanScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
