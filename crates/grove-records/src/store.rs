//! Grove Record Store
//!
//! The seam between the query engine and the document store. The engine
//! only ever issues ordered range scans, point lookups, and counts; any
//! backend that can execute those three can serve records.
//!
//! @version 0.1.0
//! @author Grove Development Team

use async_trait::async_trait;
use grove_common::Result;
use grove_document::{Document, DocumentEngine, DocumentPath, Query};
use std::sync::Arc;

// =============================================================================
// Record Store Trait
// =============================================================================

/// Read-only store interface used by the record query engine.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup by full document path.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>>;

    /// Ordered range scan.
    async fn scan(&self, query: &Query) -> Result<Vec<Document>>;

    /// Count documents matching the query's filters.
    async fn count(&self, query: &Query) -> Result<u64>;
}

#[async_trait]
impl RecordStore for DocumentEngine {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        Ok(DocumentEngine::get(self, path))
    }

    async fn scan(&self, query: &Query) -> Result<Vec<Document>> {
        let result = self.find(query)?;
        tracing::trace!(
            scanned = result.total_scanned,
            returned = result.count(),
            elapsed_ms = result.execution_time_ms,
            "document scan"
        );
        Ok(result.documents)
    }

    async fn count(&self, query: &Query) -> Result<u64> {
        let count = DocumentEngine::count(self, query)?;
        Ok(count as u64)
    }
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        (**self).get(path).await
    }

    async fn scan(&self, query: &Query) -> Result<Vec<Document>> {
        (**self).scan(query).await
    }

    async fn count(&self, query: &Query) -> Result<u64> {
        (**self).count(query).await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use grove_document::{Direction, Filter, OrderBy};

    fn engine() -> DocumentEngine {
        let engine = DocumentEngine::new();
        for id in ["u1", "u2", "u3"] {
            let path = DocumentPath::parse(&format!("orgs/a/users/{id}")).unwrap();
            engine.insert(Document::new(path).with("kind", "member")).unwrap();
        }
        engine
    }

    #[tokio::test]
    async fn test_engine_as_record_store() {
        let store: Arc<dyn RecordStore> = Arc::new(engine());

        let path = DocumentPath::parse("orgs/a/users/u2").unwrap();
        assert!(store.get(&path).await.unwrap().is_some());

        let query = Query::group("users")
            .with_order(OrderBy::document_path(Direction::Descending))
            .with_limit(2);
        let docs = store.scan(&query).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id(), "u3");

        let query = Query::group("users").with_filter(Filter::eq("kind", "member"));
        assert_eq!(store.count(&query).await.unwrap(), 3);
    }
}
