//! Grove Record Query Engine
//!
//! Facade over the record pipeline: normalize the request, drive the scan,
//! post-filter, and assemble the page.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::mapper::RecordMapper;
use crate::request::{QueryRequest, RecordParams};
use crate::response::RecordPage;
use crate::scan::{ScanDriver, ScanTarget};
use crate::stats::StatFanout;
use crate::store::RecordStore;
use grove_common::{GroveError, RecordsConfig, Result, ScanScope};
use grove_document::CollectionPath;
use std::sync::Arc;
use std::time::Instant;

// =============================================================================
// Record Query Engine
// =============================================================================

pub struct RecordQueryEngine {
    store: Arc<dyn RecordStore>,
    mapper: RecordMapper,
    config: RecordsConfig,
    default_collection: CollectionPath,
}

impl RecordQueryEngine {
    /// Create an engine. Fails if the configured records location does not
    /// form a valid collection path.
    pub fn new(store: Arc<dyn RecordStore>, config: RecordsConfig) -> Result<Self> {
        let name = config.collection.trim();
        if name.is_empty() || name.contains('/') {
            return Err(GroveError::Configuration(format!(
                "invalid records collection name: {:?}",
                config.collection
            )));
        }

        let raw = config.single_collection_path();
        let default_collection = CollectionPath::parse(&raw).map_err(|_| {
            GroveError::Configuration(format!("records path {raw:?} is not a collection path"))
        })?;

        let mapper = RecordMapper::new(StatFanout::new(store.clone(), config.stats.clone()));

        Ok(Self {
            store,
            mapper,
            config,
            default_collection,
        })
    }

    /// Normalize raw parameters against this engine's configuration.
    pub fn request(&self, params: &RecordParams) -> QueryRequest {
        QueryRequest::from_params(params, &self.config)
    }

    /// Normalize and execute in one step.
    pub async fn query_params(&self, params: &RecordParams) -> Result<RecordPage> {
        let request = self.request(params);
        self.query(&request).await
    }

    pub async fn query(&self, request: &QueryRequest) -> Result<RecordPage> {
        let start = Instant::now();
        let target = self.target(request);

        let driver = ScanDriver::new(self.store.as_ref(), &self.mapper, self.config.max_pages);
        let outcome = driver.run(&target, request).await?;

        let fetched = outcome.records.len();
        let items = match &request.text_filter {
            Some(filter) => filter.apply(outcome.records),
            None => outcome.records,
        };

        tracing::debug!(
            scope = %request.scope,
            sort_field = %request.sort.field,
            pages = outcome.pages_fetched,
            fetched,
            returned = items.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "record query complete"
        );

        Ok(RecordPage::assemble(
            items,
            request.page_size,
            outcome.next_cursor,
            request.scope,
        ))
    }

    fn target(&self, request: &QueryRequest) -> ScanTarget {
        match request.scope {
            ScanScope::Single => ScanTarget::Single(
                request
                    .path_override
                    .clone()
                    .unwrap_or_else(|| self.default_collection.clone()),
            ),
            ScanScope::Group => ScanTarget::Group(self.config.collection.clone()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
