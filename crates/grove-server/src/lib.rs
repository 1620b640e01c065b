//! Grove Server - Records API
//!
//! HTTP surface for the record query engine. Serves paginated record listings
//! over a process-wide in-memory document store.
//!
//! Key Features:
//! - `GET /api/v1/records` with sorting, scoping, cursors, and search
//! - Optional API-key protection
//! - TOML and environment configuration
//! - Request IDs, CORS, and HTTP tracing
//!
//! @version 0.1.0
//! @author Grove Development Team

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use handlers::{ApiError, ErrorResponse};
pub use router::create_router;
pub use state::AppState;
