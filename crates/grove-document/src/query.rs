//! Grove Document Query
//!
//! Ordered range scans over one collection or over every collection sharing
//! a name (a collection group). A query carries equality-style filters, an
//! order chain, an optional exclusive start position, and a limit.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::path::{CollectionPath, DocumentPath};
use crate::types::{Document, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// =============================================================================
// Query Source
// =============================================================================

/// Which collections a query reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuerySource {
    Collection(CollectionPath),
    /// Every collection whose name equals the given id, at any depth.
    Group(String),
}

impl QuerySource {
    /// Whether a collection is read by this source.
    pub fn includes(&self, collection: &CollectionPath) -> bool {
        match self {
            Self::Collection(path) => path == collection,
            Self::Group(name) => collection.name() == name,
        }
    }
}

// =============================================================================
// Ordering
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

/// A key the store can order by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderField {
    Field(String),
    /// The document's fully-qualified path (its identity key).
    DocumentPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: OrderField,
    pub direction: Direction,
}

impl OrderBy {
    pub fn field(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: OrderField::Field(name.into()),
            direction,
        }
    }

    pub fn document_path(direction: Direction) -> Self {
        Self {
            field: OrderField::DocumentPath,
            direction,
        }
    }
}

// =============================================================================
// Query
// =============================================================================

/// An ordered range scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub source: QuerySource,
    pub filters: Vec<Filter>,
    pub order_by: Vec<OrderBy>,
    /// Exclusive start position: one value per entry of the effective order
    /// chain (a prefix is allowed). Document-path positions are strings.
    pub start_after: Option<Vec<Value>>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(path: CollectionPath) -> Self {
        Self::new(QuerySource::Collection(path))
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(QuerySource::Group(name.into()))
    }

    pub fn new(source: QuerySource) -> Self {
        Self {
            source,
            filters: Vec::new(),
            order_by: Vec::new(),
            start_after: None,
            limit: None,
        }
    }

    /// Check if a document passes every filter.
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_order(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn with_start_after(mut self, position: Vec<Value>) -> Self {
        self.start_after = Some(position);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The order chain actually applied: the requested chain plus an implicit
    /// document-path tie-break in the direction of the last entry.
    pub fn effective_order(&self) -> Vec<OrderBy> {
        let mut chain = self.order_by.clone();
        let has_path = chain.iter().any(|o| o.field == OrderField::DocumentPath);
        if !has_path {
            let direction = chain.last().map(|o| o.direction).unwrap_or_default();
            chain.push(OrderBy::document_path(direction));
        }
        chain
    }

    /// Whether a document carries every ordered field. Documents missing one
    /// are excluded from ordered scans.
    pub fn has_order_fields(&self, doc: &Document) -> bool {
        self.order_by.iter().all(|o| match &o.field {
            OrderField::Field(name) => doc.contains(name),
            OrderField::DocumentPath => true,
        })
    }

    /// The values of `doc` along `chain`, usable as a `start_after` position.
    pub fn position_of(chain: &[OrderBy], doc: &Document) -> Vec<Value> {
        chain
            .iter()
            .map(|o| match &o.field {
                OrderField::Field(name) => doc.get(name).cloned().unwrap_or_default(),
                OrderField::DocumentPath => Value::String(doc.path.to_string()),
            })
            .collect()
    }

    /// Compare two documents along `chain`.
    pub fn compare(chain: &[OrderBy], a: &Document, b: &Document) -> Ordering {
        for order in chain {
            let ord = match &order.field {
                OrderField::Field(name) => {
                    let null = Value::Null;
                    let va = a.get(name).unwrap_or(&null);
                    let vb = b.get(name).unwrap_or(&null);
                    va.total_cmp(vb)
                }
                OrderField::DocumentPath => a.path.cmp(&b.path),
            };
            let ord = order.direction.apply(ord);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Compare a document against a `start_after` position along `chain`.
    /// Only the position's prefix length participates.
    pub fn compare_to_position(&self, chain: &[OrderBy], doc: &Document, position: &[Value]) -> Ordering {
        for (order, cursor) in chain.iter().zip(position.iter()) {
            let ord = match &order.field {
                OrderField::Field(name) => {
                    let null = Value::Null;
                    doc.get(name).unwrap_or(&null).total_cmp(cursor)
                }
                OrderField::DocumentPath => match self.resolve_path(cursor) {
                    Some(path) => doc.path.cmp(&path),
                    None => Value::String(doc.path.to_string()).total_cmp(cursor),
                },
            };
            let ord = order.direction.apply(ord);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Document-path positions may be a full path, or a bare id relative to
    /// a single-collection source.
    fn resolve_path(&self, cursor: &Value) -> Option<DocumentPath> {
        let raw = cursor.as_str()?;
        if let Ok(path) = DocumentPath::parse(raw) {
            return Some(path);
        }
        match &self.source {
            QuerySource::Collection(collection) => collection.doc(raw).ok(),
            QuerySource::Group(_) => None,
        }
    }
}

// =============================================================================
// Filter
// =============================================================================

/// A filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Eq { field: String, value: Value },
    /// The field is an array containing `value`.
    ArrayContains { field: String, value: Value },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn array_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::ArrayContains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check if a document matches this filter.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Eq { field, value } => doc
                .get(field)
                .map(|v| v.total_cmp(value) == Ordering::Equal)
                .unwrap_or(false),
            Self::ArrayContains { field, value } => doc
                .get(field)
                .and_then(Value::as_array)
                .map(|arr| arr.iter().any(|v| v.total_cmp(value) == Ordering::Equal))
                .unwrap_or(false),
        }
    }
}

// =============================================================================
// Query Result
// =============================================================================

/// Result of a document query.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub documents: Vec<Document>,
    /// Documents examined across every included collection.
    pub total_scanned: usize,
    pub execution_time_ms: u64,
}

impl QueryResult {
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
