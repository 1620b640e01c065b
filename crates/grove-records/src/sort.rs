//! Grove Sort Policy
//!
//! Validates the requested sort field against a fixed whitelist and derives
//! the store order chain. The identity key always closes the chain, so
//! pagination stays deterministic when the sort field has duplicates.
//!
//! @version 0.1.0
//! @author Grove Development Team

use grove_document::{Direction, OrderBy};
use serde::Serialize;
use std::fmt;

// =============================================================================
// Sort Field
// =============================================================================

/// Whitelisted sort fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    CreationTime,
    /// The store's identity key. Never excludes records lacking an optional
    /// attribute, hence the default.
    #[default]
    RecordId,
    Email,
    DisplayName,
}

impl SortField {
    /// Parse a requested field. Absent or unknown names fall back to
    /// `RecordId`.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "creationtime" | "createdat" => Self::CreationTime,
            "recordid" | "id" => Self::RecordId,
            "email" => Self::Email,
            "displayname" => Self::DisplayName,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreationTime => "creationTime",
            Self::RecordId => "recordId",
            Self::Email => "email",
            Self::DisplayName => "displayName",
        }
    }

    /// Stored field the store orders by. None for the identity key.
    pub fn store_field(&self) -> Option<&'static str> {
        match self {
            Self::CreationTime => Some("createdAt"),
            Self::RecordId => None,
            Self::Email => Some("email"),
            Self::DisplayName => Some("displayName"),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::RecordId)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sort Direction
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Only a literal `asc` (any case) selects ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_direction(&self) -> Direction {
        match self {
            Self::Asc => Direction::Ascending,
            Self::Desc => Direction::Descending,
        }
    }
}

// =============================================================================
// Sort Spec
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn parse(field: Option<&str>, direction: Option<&str>) -> Self {
        Self::new(SortField::parse(field), SortDirection::parse(direction))
    }

    /// Store order chain: the sort field (unless it is the identity key)
    /// followed by the document path, both in the requested direction.
    pub fn order_by(&self) -> Vec<OrderBy> {
        let direction = self.direction.as_direction();
        let mut chain = Vec::with_capacity(2);
        if let Some(field) = self.field.store_field() {
            chain.push(OrderBy::field(field, direction));
        }
        chain.push(OrderBy::document_path(direction));
        chain
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use grove_document::OrderField;

    #[test]
    fn test_field_whitelist() {
        assert_eq!(SortField::parse(Some("email")), SortField::Email);
        assert_eq!(SortField::parse(Some("displayName")), SortField::DisplayName);
        assert_eq!(SortField::parse(Some("createdAt")), SortField::CreationTime);
        assert_eq!(SortField::parse(Some("creationTime")), SortField::CreationTime);
        assert_eq!(SortField::parse(Some("password")), SortField::RecordId);
        assert_eq!(SortField::parse(Some("")), SortField::RecordId);
        assert_eq!(SortField::parse(None), SortField::RecordId);
    }

    #[test]
    fn test_direction_defaults_to_desc() {
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("ASC")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("ascending")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("up")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);
    }

    #[test]
    fn test_order_chain_has_tie_break() {
        let spec = SortSpec::parse(Some("email"), Some("asc"));
        let chain = spec.order_by();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].field, OrderField::Field("email".to_string()));
        assert_eq!(chain[1].field, OrderField::DocumentPath);
        assert!(chain.iter().all(|o| o.direction == Direction::Ascending));
    }

    #[test]
    fn test_identity_chain_is_single_entry() {
        let chain = SortSpec::default().order_by();
        assert_eq!(chain, vec![OrderBy::document_path(Direction::Descending)]);
    }
}
