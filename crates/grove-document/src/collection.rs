//! Grove Document Collection
//!
//! A single collection of documents at one path.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::path::CollectionPath;
use crate::query::Query;
use crate::types::Document;
use parking_lot::RwLock;
use std::collections::BTreeMap;

// =============================================================================
// Collection
// =============================================================================

/// A collection of documents keyed by document id.
pub struct Collection {
    path: CollectionPath,
    documents: RwLock<BTreeMap<String, Document>>,
}

impl Collection {
    pub fn new(path: CollectionPath) -> Self {
        Self {
            path,
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    // -------------------------------------------------------------------------
    // Document Operations
    // -------------------------------------------------------------------------

    /// Insert or replace a document. Returns the previous version, if any.
    pub fn upsert(&self, doc: Document) -> Option<Document> {
        let mut docs = self.documents.write();
        docs.insert(doc.id().to_string(), doc)
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.documents.read().get(id).cloned()
    }

    pub fn count(&self) -> usize {
        self.documents.read().len()
    }

    // -------------------------------------------------------------------------
    // Query Operations
    // -------------------------------------------------------------------------

    /// Documents passing the query's filters and carrying its order fields.
    /// Returns the candidates and the number of documents examined.
    pub fn candidates(&self, query: &Query) -> (Vec<Document>, usize) {
        let docs = self.documents.read();
        let matching = docs
            .values()
            .filter(|doc| query.matches(doc) && query.has_order_fields(doc))
            .cloned()
            .collect();
        (matching, docs.len())
    }

    /// Count documents passing the query's filters.
    pub fn count_matching(&self, query: &Query) -> usize {
        let docs = self.documents.read();
        docs.values().filter(|doc| query.matches(doc)).count()
    }
}

// =============================================================================
// Tests
// =============================================================================
