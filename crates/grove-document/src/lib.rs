//! Grove Document - Hierarchical Document Store
//!
//! Schema-flexible JSON documents grouped into collections nested under
//! parent documents. The same collection name may repeat at any depth, and
//! a collection-group scan reads every collection sharing that name.
//!
//! Key Features:
//! - Typed collection and document paths
//! - Total cross-type value ordering with a path tie-break
//! - Ordered range scans with exclusive start positions
//! - Point lookups and filtered counts
//!
//! @version 0.1.0
//! @author Grove Development Team

pub mod collection;
pub mod engine;
pub mod path;
pub mod query;
pub mod types;

pub use collection::Collection;
pub use engine::{DocumentEngine, EngineConfig, EngineError};
pub use path::{CollectionPath, DocumentPath};
pub use query::{Direction, Filter, OrderBy, OrderField, Query, QueryResult, QuerySource};
pub use types::{Document, Value};
