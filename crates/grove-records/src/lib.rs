//! Grove Records - Paginated Record Query Engine
//!
//! Serves one logical entity type ("records") out of a hierarchical document
//! store, either from a single fixed collection or from every collection
//! sharing the records collection name.
//!
//! Key Features:
//! - Whitelisted sort fields with a deterministic identity tie-break
//! - Resumable cursors for both scan scopes
//! - Accumulate-all mode bounded by a page ceiling
//! - Per-record aggregate stats via concurrent count queries
//! - Case-insensitive post-filter over mapped records
//!
//! @version 0.1.0
//! @author Grove Development Team

pub mod cursor;
pub mod engine;
pub mod filter;
pub mod mapper;
pub mod request;
pub mod response;
pub mod scan;
pub mod sort;
pub mod stats;
pub mod store;

pub use cursor::GroupCursor;
pub use engine::RecordQueryEngine;
pub use filter::TextFilter;
pub use mapper::{Record, RecordMapper};
pub use request::{QueryRequest, RecordParams};
pub use response::RecordPage;
pub use scan::{ScanDriver, ScanOutcome, ScanTarget};
pub use sort::{SortDirection, SortField, SortSpec};
pub use stats::{RecordStats, StatFanout};
pub use store::RecordStore;
