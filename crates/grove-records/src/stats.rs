//! Grove Stat Fan-out
//!
//! Derives per-record aggregate counts from two auxiliary collections. The
//! three count queries run concurrently; each one degrades to zero on its
//! own failure, so a broken index costs a stat, never the request.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::store::RecordStore;
use grove_common::StatsConfig;
use grove_document::{Filter, Query};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

// =============================================================================
// Record Stats
// =============================================================================

/// Aggregate counts attached to every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStats {
    pub schedule_count: u64,
    pub history_total: u64,
    pub history_pending: u64,
}

// =============================================================================
// Stat Fan-out
// =============================================================================

pub struct StatFanout {
    store: Arc<dyn RecordStore>,
    config: StatsConfig,
}

impl StatFanout {
    pub fn new(store: Arc<dyn RecordStore>, config: StatsConfig) -> Self {
        Self { store, config }
    }

    /// Fetch all three stats for `record_id`. Never fails.
    pub async fn fetch(&self, record_id: &str) -> RecordStats {
        let start = Instant::now();

        let schedules = self.schedule_query(record_id);
        let history = self.history_query(record_id);
        let pending = self.pending_query(record_id);

        let (schedule_count, history_total, history_pending) = tokio::join!(
            self.count_or_zero("scheduleCount", record_id, &schedules),
            self.count_or_zero("historyTotal", record_id, &history),
            self.count_or_zero("historyPending", record_id, &pending),
        );

        let elapsed = start.elapsed();
        if elapsed >= Duration::from_millis(self.config.slow_threshold_ms) {
            tracing::warn!(
                record_id,
                elapsed_ms = elapsed.as_millis() as u64,
                "slow stat fan-out"
            );
        }

        RecordStats {
            schedule_count,
            history_total,
            history_pending,
        }
    }

    async fn count_or_zero(&self, stat: &'static str, record_id: &str, query: &Query) -> u64 {
        match self.store.count(query).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(stat, record_id, error = %e, "stat query failed, defaulting to zero");
                0
            }
        }
    }

    fn schedule_query(&self, record_id: &str) -> Query {
        Query::group(&self.config.schedules_collection)
            .with_filter(Filter::array_contains(&self.config.schedule_members_field, record_id))
    }

    fn history_query(&self, record_id: &str) -> Query {
        Query::group(&self.config.history_collection)
            .with_filter(Filter::eq(&self.config.history_owner_field, record_id))
    }

    fn pending_query(&self, record_id: &str) -> Query {
        self.history_query(record_id).with_filter(Filter::eq(
            &self.config.history_status_field,
            self.config.pending_status.as_str(),
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use grove_common::{GroveError, Result};
    use grove_document::{Document, DocumentEngine, DocumentPath, QuerySource, Value};

    fn seeded_engine() -> DocumentEngine {
        let engine = DocumentEngine::new();
        let docs = [
            ("orgs/a/schedules/s1", vec![("participants", Value::Array(vec!["u1".into(), "u2".into()]))]),
            ("orgs/b/schedules/s2", vec![("participants", Value::Array(vec!["u1".into()]))]),
            ("orgs/b/schedules/s3", vec![("participants", Value::Array(vec!["u2".into()]))]),
            ("orgs/a/users/u1/history/h1", vec![("userId", "u1".into()), ("status", "pending".into())]),
            ("orgs/a/users/u1/history/h2", vec![("userId", "u1".into()), ("status", "done".into())]),
            ("orgs/a/users/u1/history/h3", vec![("userId", "u1".into()), ("status", "pending".into())]),
            ("orgs/b/history/h4", vec![("userId", "u2".into()), ("status", "pending".into())]),
        ];
        for (path, fields) in docs {
            let mut doc = Document::new(DocumentPath::parse(path).unwrap());
            for (k, v) in fields {
                doc.set(k, v);
            }
            engine.insert(doc).unwrap();
        }
        engine
    }

    /// Fails every count against one collection group.
    struct FailingGroup {
        inner: DocumentEngine,
        failing: &'static str,
    }

    #[async_trait]
    impl RecordStore for FailingGroup {
        async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
            RecordStore::get(&self.inner, path).await
        }

        async fn scan(&self, query: &Query) -> Result<Vec<Document>> {
            RecordStore::scan(&self.inner, query).await
        }

        async fn count(&self, query: &Query) -> Result<u64> {
            if query.source == QuerySource::Group(self.failing.to_string()) {
                return Err(GroveError::IndexNotFound(self.failing.to_string()));
            }
            RecordStore::count(&self.inner, query).await
        }
    }

    #[tokio::test]
    async fn test_fetch_counts() {
        let fanout = StatFanout::new(Arc::new(seeded_engine()), StatsConfig::default());

        let stats = fanout.fetch("u1").await;
        assert_eq!(
            stats,
            RecordStats {
                schedule_count: 2,
                history_total: 3,
                history_pending: 2,
            }
        );

        let stats = fanout.fetch("u2").await;
        assert_eq!(stats.schedule_count, 2);
        assert_eq!(stats.history_total, 1);
        assert_eq!(stats.history_pending, 1);
    }

    #[tokio::test]
    async fn test_unknown_record_is_all_zero() {
        let fanout = StatFanout::new(Arc::new(seeded_engine()), StatsConfig::default());
        assert_eq!(fanout.fetch("nobody").await, RecordStats::default());
    }

    #[tokio::test]
    async fn test_one_failing_query_degrades_that_stat_only() {
        let store = FailingGroup {
            inner: seeded_engine(),
            failing: "schedules",
        };
        let fanout = StatFanout::new(Arc::new(store), StatsConfig::default());

        let stats = fanout.fetch("u1").await;
        assert_eq!(stats.schedule_count, 0);
        assert_eq!(stats.history_total, 3);
        assert_eq!(stats.history_pending, 2);
    }

    #[tokio::test]
    async fn test_failing_history_zeroes_both_history_stats() {
        let store = FailingGroup {
            inner: seeded_engine(),
            failing: "history",
        };
        let fanout = StatFanout::new(Arc::new(store), StatsConfig::default());

        let stats = fanout.fetch("u1").await;
        assert_eq!(stats.schedule_count, 2);
        assert_eq!(stats.history_total, 0);
        assert_eq!(stats.history_pending, 0);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_value(RecordStats {
            schedule_count: 1,
            history_total: 2,
            history_pending: 3,
        })
        .unwrap();
        assert_eq!(json["scheduleCount"], 1);
        assert_eq!(json["historyTotal"], 2);
        assert_eq!(json["historyPending"], 3);
    }
}
