//! Grove Document Engine
//!
//! Core engine that coordinates all document store operations: point
//! lookups by path, ordered range scans over a collection or a collection
//! group, and filtered counts.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::collection::Collection;
use crate::path::{CollectionPath, DocumentPath};
use crate::query::{Query, QueryResult};
use crate::types::Document;
use grove_common::GroveError;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Instant;
use thiserror::Error;

// =============================================================================
// Document Engine Configuration
// =============================================================================

/// Configuration for the document engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_collections: usize,
    /// Upper bound on documents returned by one scan.
    pub max_scan_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_collections: 100_000,
            max_scan_limit: 10_000,
        }
    }
}

// =============================================================================
// Document Engine
// =============================================================================

/// The main document storage and query engine.
pub struct DocumentEngine {
    config: EngineConfig,
    collections: RwLock<BTreeMap<CollectionPath, Collection>>,
    stats: RwLock<EngineStats>,
}

impl DocumentEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            collections: RwLock::new(BTreeMap::new()),
            stats: RwLock::new(EngineStats::default()),
        }
    }

    // -------------------------------------------------------------------------
    // Collection Management
    // -------------------------------------------------------------------------

    /// List all collection paths.
    pub fn list_collections(&self) -> Vec<CollectionPath> {
        self.collections.read().keys().cloned().collect()
    }

    pub fn collection_exists(&self, path: &CollectionPath) -> bool {
        self.collections.read().contains_key(path)
    }

    // -------------------------------------------------------------------------
    // Document Operations
    // -------------------------------------------------------------------------

    /// Insert or replace a document, creating its collection on first use.
    pub fn insert(&self, doc: Document) -> Result<(), EngineError> {
        let collection_path = doc.path.collection();
        let mut collections = self.collections.write();

        if !collections.contains_key(&collection_path) {
            if collections.len() >= self.config.max_collections {
                return Err(EngineError::TooManyCollections);
            }
            collections.insert(collection_path.clone(), Collection::new(collection_path.clone()));
        }

        if let Some(collection) = collections.get(&collection_path) {
            collection.upsert(doc);
        }
        drop(collections);

        self.stats.write().documents_inserted += 1;
        Ok(())
    }

    /// Insert documents from a JSON object keyed by document path.
    pub fn load_json(&self, seed: serde_json::Value) -> Result<usize, EngineError> {
        let serde_json::Value::Object(entries) = seed else {
            return Err(EngineError::InvalidDocument("seed must be a JSON object".to_string()));
        };

        let mut count = 0;
        for (raw_path, fields) in entries {
            let path = DocumentPath::parse(&raw_path)?;
            let doc = Document::from_json(path, fields)
                .ok_or_else(|| EngineError::InvalidDocument(raw_path.clone()))?;
            self.insert(doc)?;
            count += 1;
        }
        Ok(count)
    }

    /// Point lookup by full path.
    pub fn get(&self, path: &DocumentPath) -> Option<Document> {
        let collections = self.collections.read();
        let doc = collections
            .get(&path.collection())
            .and_then(|c| c.get(path.id()));
        drop(collections);

        self.stats.write().lookups += 1;
        doc
    }

    // -------------------------------------------------------------------------
    // Query Operations
    // -------------------------------------------------------------------------

    /// Execute an ordered range scan.
    pub fn find(&self, query: &Query) -> Result<QueryResult, EngineError> {
        let start = Instant::now();
        let chain = query.effective_order();

        if let Some(ref position) = query.start_after {
            if position.len() > chain.len() {
                return Err(EngineError::InvalidQuery(format!(
                    "start position has {} values for an order chain of {}",
                    position.len(),
                    chain.len()
                )));
            }
        }

        let mut documents = Vec::new();
        let mut total_scanned = 0;
        {
            let collections = self.collections.read();
            for collection in collections.values().filter(|c| query.source.includes(c.path())) {
                let (candidates, scanned) = collection.candidates(query);
                documents.extend(candidates);
                total_scanned += scanned;
            }
        }

        documents.sort_by(|a, b| Query::compare(&chain, a, b));

        if let Some(ref position) = query.start_after {
            documents.retain(|doc| query.compare_to_position(&chain, doc, position) == Ordering::Greater);
        }

        let limit = query
            .limit
            .unwrap_or(self.config.max_scan_limit)
            .min(self.config.max_scan_limit);
        documents.truncate(limit);

        self.stats.write().queries_executed += 1;

        Ok(QueryResult {
            documents,
            total_scanned,
            execution_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Count documents matching the query's filters. Order, position and
    /// limit are ignored.
    pub fn count(&self, query: &Query) -> Result<usize, EngineError> {
        let collections = self.collections.read();
        let total = collections
            .values()
            .filter(|c| query.source.includes(c.path()))
            .map(|c| c.count_matching(query))
            .sum();
        drop(collections);

        self.stats.write().counts_executed += 1;
        Ok(total)
    }

    // -------------------------------------------------------------------------
    // Statistics
    // -------------------------------------------------------------------------

    pub fn stats(&self) -> EngineStats {
        self.stats.read().clone()
    }
}

impl Default for DocumentEngine {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Engine Statistics
// =============================================================================

/// Statistics for the document engine.
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    pub documents_inserted: u64,
    pub lookups: u64,
    pub queries_executed: u64,
    pub counts_executed: u64,
}

// =============================================================================
// Engine Error
// =============================================================================

/// Errors that can occur in the document engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("maximum number of collections reached")]
    TooManyCollections,
}

impl From<EngineError> for GroveError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidPath(path) => GroveError::InvalidPath(path),
            EngineError::InvalidQuery(msg) => GroveError::Query(msg),
            other => GroveError::Storage(other.to_string()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
