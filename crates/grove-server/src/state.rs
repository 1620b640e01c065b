//! Grove Server State
//!
//! Application state shared across request handlers, plus the process-wide
//! document store. The store is created on first use and lives for the
//! rest of the process.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::config::ServerConfig;
use grove_common::{GroveError, Result};
use grove_document::DocumentEngine;
use grove_records::{RecordQueryEngine, RecordStore};
use std::path::Path;
use std::sync::{Arc, OnceLock};

// =============================================================================
// Process Store
// =============================================================================

static STORE: OnceLock<Arc<DocumentEngine>> = OnceLock::new();

/// The process-wide document store, created on first call.
pub fn store() -> Arc<DocumentEngine> {
    STORE
        .get_or_init(|| {
            tracing::info!("initializing document store");
            Arc::new(DocumentEngine::new())
        })
        .clone()
}

/// Load a JSON seed file of `{"<document path>": {fields}}` into `engine`.
pub fn load_seed(engine: &DocumentEngine, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let seed: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| GroveError::Serialization(format!("{}: {}", path.display(), e)))?;
    let loaded = engine.load_json(seed)?;
    tracing::info!(documents = loaded, seed = %path.display(), "loaded seed data");
    Ok(loaded)
}

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub records: Arc<RecordQueryEngine>,
}

impl AppState {
    /// Create state over the process-wide store.
    pub fn new(config: ServerConfig) -> Result<Self> {
        Self::with_store(config, store())
    }

    /// Create state over an explicit store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn RecordStore>) -> Result<Self> {
        let records = RecordQueryEngine::new(store, config.records.clone())?;
        Ok(Self {
            config: Arc::new(config),
            records: Arc::new(records),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
