//! Grove Error - Unified Error Types
//!
//! Error handling shared by every Grove crate. Categorizes errors by domain
//! (storage, query, configuration) and classifies them so callers can decide
//! whether to retry and whether the fault lies with the caller.
//!
//! @version 0.1.0
//! @author Grove Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Unified error type for all Grove operations.
#[derive(Error, Debug)]
pub enum GroveError {
    // Storage errors
    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    // Query errors
    #[error("query error: {0}")]
    Query(String),

    #[error("index not found: {0}")]
    IndexNotFound(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("timeout: {0}")]
    Timeout(String),
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Result type alias for Grove operations.
pub type Result<T> = std::result::Result<T, GroveError>;

// =============================================================================
// Error Classification
// =============================================================================

impl GroveError {
    /// Returns true if the operation can be safely retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GroveError::Unavailable(_) | GroveError::Timeout(_))
    }

    /// Returns true if this is a user error (vs system error).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GroveError::InvalidPath(_) | GroveError::Query(_) | GroveError::Configuration(_)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(GroveError::Unavailable("down".into()).is_retryable());
        assert!(GroveError::Timeout("slow".into()).is_retryable());
        assert!(!GroveError::Storage("disk".into()).is_retryable());
    }

    #[test]
    fn test_user_error_classification() {
        assert!(GroveError::InvalidPath("a/b".into()).is_user_error());
        assert!(GroveError::Configuration("collection".into()).is_user_error());
        assert!(!GroveError::IndexNotFound("history".into()).is_user_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GroveError = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }
}
