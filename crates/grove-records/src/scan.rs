//! Grove Scan Driver
//!
//! Pagination state machine shared by both scan scopes. Each iteration
//! builds an ordered range query, executes it, maps the documents into
//! records, and either stops or resumes after the last document.
//!
//! Single-scope cursors are bare record ids resolved by point lookup.
//! Group-scope cursors are opaque tokens from the cursor codec, since ids
//! alone do not identify a position across collections.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::cursor::{self, GroupCursor};
use crate::mapper::{Record, RecordMapper};
use crate::request::QueryRequest;
use crate::sort::SortSpec;
use crate::store::RecordStore;
use grove_common::Result;
use grove_document::{CollectionPath, Document, OrderBy, Query, Value};

// =============================================================================
// Scan Target
// =============================================================================

/// The collections one request reads.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanTarget {
    Single(CollectionPath),
    /// Collection-group scan over every collection with this name.
    Group(String),
}

impl ScanTarget {
    fn base_query(&self, sort: &SortSpec) -> Query {
        let query = match self {
            Self::Single(path) => Query::collection(path.clone()),
            Self::Group(name) => Query::group(name.clone()),
        };
        sort.order_by()
            .into_iter()
            .fold(query, |query, order| query.with_order(order))
    }
}

// =============================================================================
// Scan Outcome
// =============================================================================

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub records: Vec<Record>,
    /// Set only when another page exists and the scan is not accumulating.
    pub next_cursor: Option<String>,
    pub pages_fetched: usize,
}

// =============================================================================
// Scan Driver
// =============================================================================

pub struct ScanDriver<'a> {
    store: &'a dyn RecordStore,
    mapper: &'a RecordMapper,
    max_pages: usize,
}

impl<'a> ScanDriver<'a> {
    pub fn new(store: &'a dyn RecordStore, mapper: &'a RecordMapper, max_pages: usize) -> Self {
        Self {
            store,
            mapper,
            max_pages: max_pages.max(1),
        }
    }

    /// Run one request to completion: a single page, or every page up to
    /// the ceiling when accumulating.
    pub async fn run(&self, target: &ScanTarget, request: &QueryRequest) -> Result<ScanOutcome> {
        let base = target.base_query(&request.sort);
        let chain = base.effective_order();
        let page_size = request.page_size;

        let mut position = self.start_position(target, request, &base, &chain).await?;
        let mut records = Vec::new();
        let mut next_cursor = None;
        let mut pages_fetched = 0;

        loop {
            // One document past the page tells whether another page exists.
            let mut query = base.clone().with_limit(page_size + 1);
            if let Some(start) = position.take() {
                query = query.with_start_after(start);
            }

            let mut docs = self.store.scan(&query).await?;
            pages_fetched += 1;
            let has_more = docs.len() > page_size;
            docs.truncate(page_size);

            tracing::debug!(
                page = pages_fetched,
                fetched = docs.len(),
                has_more,
                "scanned record page"
            );

            for doc in &docs {
                records.push(self.mapper.map(doc).await);
            }

            let Some(last) = docs.last().filter(|_| has_more) else {
                break;
            };

            if !request.accumulate_all {
                next_cursor = Some(outgoing_cursor(target, &request.sort, last));
                break;
            }

            if pages_fetched >= self.max_pages {
                tracing::debug!(
                    max_pages = self.max_pages,
                    records = records.len(),
                    "accumulate-all page ceiling reached, truncating"
                );
                break;
            }

            position = Some(Query::position_of(&chain, last));
        }

        Ok(ScanOutcome {
            records,
            next_cursor,
            pages_fetched,
        })
    }

    /// Resolve the incoming cursor into a start position. Anything that
    /// cannot be resolved starts the scan from the beginning.
    async fn start_position(
        &self,
        target: &ScanTarget,
        request: &QueryRequest,
        base: &Query,
        chain: &[OrderBy],
    ) -> Result<Option<Vec<Value>>> {
        let Some(raw) = request.cursor.as_deref() else {
            return Ok(None);
        };

        match target {
            ScanTarget::Single(collection) => {
                let Ok(path) = collection.doc(raw) else {
                    tracing::debug!(cursor = raw, "cursor is not a record id, ignoring");
                    return Ok(None);
                };
                match self.store.get(&path).await? {
                    Some(doc) if base.has_order_fields(&doc) => {
                        Ok(Some(Query::position_of(chain, &doc)))
                    }
                    _ => {
                        tracing::debug!(cursor = raw, "cursor record not resumable, ignoring");
                        Ok(None)
                    }
                }
            }
            ScanTarget::Group(_) => {
                let Some(decoded) = cursor::decode(raw) else {
                    tracing::debug!("malformed group cursor, ignoring");
                    return Ok(None);
                };
                let path = Value::String(decoded.path);
                if request.sort.field.is_identity() {
                    return Ok(Some(vec![path]));
                }
                match decoded.sort_value {
                    Some(sort_value) => Ok(Some(vec![sort_value, path])),
                    None => {
                        tracing::debug!("group cursor lacks a sort value, ignoring");
                        Ok(None)
                    }
                }
            }
        }
    }
}

/// Cursor pointing just past `last`.
fn outgoing_cursor(target: &ScanTarget, sort: &SortSpec, last: &Document) -> String {
    match target {
        ScanTarget::Single(_) => last.id().to_string(),
        ScanTarget::Group(_) => {
            let sort_value = sort
                .field
                .store_field()
                .map(|field| last.get(field).cloned().unwrap_or_default());
            cursor::encode(&GroupCursor::new(sort_value, last.path.to_string()))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
