//! Grove Document Paths
//!
//! Hierarchical addressing for the document store. A collection path has an
//! odd number of segments (`orgs/acme/users`), a document path an even number
//! (`orgs/acme/users/u1`). Paths order segment by segment, which is the order
//! the store uses as its final tie-break.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::engine::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn split_segments(raw: &str) -> Vec<String> {
    raw.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Collection Path
// =============================================================================

/// Path to a collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionPath(Vec<String>);

impl CollectionPath {
    /// Parse a slash-separated collection path. Leading, trailing and doubled
    /// slashes are ignored.
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        let segments = split_segments(raw);
        if segments.is_empty() || segments.len() % 2 == 0 {
            return Err(EngineError::InvalidPath(raw.to_string()));
        }
        Ok(Self(segments))
    }

    /// The collection name (last segment).
    pub fn name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// The document this collection is nested under, if any.
    pub fn parent(&self) -> Option<DocumentPath> {
        if self.0.len() < 3 {
            return None;
        }
        Some(DocumentPath(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Path of the document `id` inside this collection.
    pub fn doc(&self, id: &str) -> Result<DocumentPath, EngineError> {
        if id.is_empty() || id.contains('/') {
            return Err(EngineError::InvalidPath(format!("{}/{}", self, id)));
        }
        let mut segments = self.0.clone();
        segments.push(id.to_string());
        Ok(DocumentPath(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl FromStr for CollectionPath {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CollectionPath {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<CollectionPath> for String {
    fn from(path: CollectionPath) -> Self {
        path.to_string()
    }
}

// =============================================================================
// Document Path
// =============================================================================

/// Fully-qualified path to a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath(Vec<String>);

impl DocumentPath {
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        let segments = split_segments(raw);
        if segments.is_empty() || segments.len() % 2 != 0 {
            return Err(EngineError::InvalidPath(raw.to_string()));
        }
        Ok(Self(segments))
    }

    /// The document id (last segment).
    pub fn id(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// The collection holding this document.
    pub fn collection(&self) -> CollectionPath {
        CollectionPath(self.0[..self.0.len() - 1].to_vec())
    }

    /// Name of the collection holding this document.
    pub fn collection_name(&self) -> &str {
        &self.0[self.0.len() - 2]
    }

    /// Path of a subcollection nested under this document.
    pub fn child(&self, name: &str) -> Result<CollectionPath, EngineError> {
        if name.is_empty() || name.contains('/') {
            return Err(EngineError::InvalidPath(format!("{}/{}", self, name)));
        }
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Ok(CollectionPath(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl FromStr for DocumentPath {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<DocumentPath> for String {
    fn from(path: DocumentPath) -> Self {
        path.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
