//! Error types for the discovery engine
//!
//! Every public operation returns [`Result`]. Errors carry a tagged kind so
//! the presentation layer can map them to a status code once, at the
//! boundary, instead of inspecting error types at runtime.

use engage_cache::CacheError;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine error taxonomy
#[derive(Error, Debug)]
pub enum EngineError {
    /// Input failed validation (unknown platform, bad timeframe, zero limit)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Underlying content repository failed
    #[error("Repository error: {0}")]
    Repository(String),

    /// Cache backend failed. Read paths degrade to a miss instead of
    /// surfacing this; it only escapes where a caller asked the cache
    /// layer directly.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Cached payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stable error kinds exposed to the boundary layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Repository,
    Cache,
    Serialization,
}

impl ErrorKind {
    /// HTTP status code the boundary should respond with
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Repository | ErrorKind::Serialization => 500,
            ErrorKind::Cache => 503,
        }
    }
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation(_) => ErrorKind::Validation,
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::Repository(_) => ErrorKind::Repository,
            EngineError::Cache(_) => ErrorKind::Cache,
            EngineError::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => EngineError::NotFound("row not found".to_string()),
            other => EngineError::Repository(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            EngineError::Validation("bad".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            EngineError::NotFound("gone".into()).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::Validation.status_code(), 400);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Repository.status_code(), 500);
        assert_eq!(ErrorKind::Cache.status_code(), 503);
    }
}
