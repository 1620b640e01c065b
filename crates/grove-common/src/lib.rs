//! Grove Common - Shared Types and Utilities
//!
//! Foundational types, error handling, and configuration used across the
//! Grove crates. The document store, the record query engine, and the HTTP
//! server all speak these types at their boundaries.
//!
//! Key Features:
//! - Unified error type with retryable/user error classification
//! - Record query configuration with serde defaults
//! - Scan scope selection shared by config and request parsing
//!
//! @version 0.1.0
//! @author Grove Development Team

pub mod config;
pub mod error;
pub mod types;

pub use config::{RecordsConfig, StatsConfig};
pub use error::{GroveError, Result};
pub use types::ScanScope;
