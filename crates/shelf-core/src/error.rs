//! # Error Types
//!
//! Typed error handling for the bookshelf backend.
//! All fallible operations return `Result<T, ShelfError>`.

use thiserror::Error;

/// Core error type for all backend operations
#[derive(Debug, Error)]
pub enum ShelfError {
    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or rejected input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, malformed, or expired credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but lacking the required role or ownership
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Document not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Store or provider call exceeded its deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with an upstream
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShelfError {
    /// Returns true if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ShelfError::Network(_) | ShelfError::Timeout(_) | ShelfError::Store(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShelfError::Configuration(_) => 500,
            ShelfError::Validation(_) => 400,
            ShelfError::Unauthorized(_) => 401,
            ShelfError::Forbidden(_) => 403,
            ShelfError::NotFound(_) => 404,
            ShelfError::Store(_) => 502,
            ShelfError::Timeout(_) => 504,
            ShelfError::Provider { .. } => 502,
            ShelfError::Network(_) => 503,
            ShelfError::Serialization(_) => 500,
            ShelfError::Internal(_) => 500,
        }
    }
}

/// Result type alias for backend operations
pub type ShelfResult<T> = Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ShelfError::Validation("bad".into()).status_code(), 400);
        assert_eq!(ShelfError::Unauthorized("no token".into()).status_code(), 401);
        assert_eq!(ShelfError::Forbidden("not admin".into()).status_code(), 403);
        assert_eq!(ShelfError::NotFound("book".into()).status_code(), 404);
        assert_eq!(ShelfError::Timeout("store".into()).status_code(), 504);
        assert_eq!(
            ShelfError::Provider {
                provider: "stripe".into(),
                message: "declined".into()
            }
            .status_code(),
            502
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ShelfError::Network("reset".into()).is_retryable());
        assert!(ShelfError::Timeout("store".into()).is_retryable());
        assert!(!ShelfError::Forbidden("nope".into()).is_retryable());
    }
}
