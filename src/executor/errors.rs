//! Executor error types
//!
//! Error codes:
//! - EXEC_UNKNOWN_COLLECTION
//! - EXEC_INVALID_PATTERN
//! - EXEC_INVALID_DATA
//! - EXEC_WRITE_FAILED
//! - translation failures keep their CRITERIA_* code

use thiserror::Error;

use crate::translator::TranslateError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Errors raised while running a query against a store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// Store holds no collection for the query root
    #[error("Unknown collection '{0}'")]
    UnknownCollection(String),

    /// LIKE pattern could not be compiled
    #[error("Invalid LIKE pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Row data could not be loaded
    #[error("Invalid data at {location}: {reason}")]
    InvalidData { location: String, reason: String },

    /// Store could not be written back
    #[error("Failed to write {location}: {reason}")]
    WriteFailed { location: String, reason: String },

    /// Criteria could not be translated
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

impl ExecutorError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::UnknownCollection(_) => "EXEC_UNKNOWN_COLLECTION",
            ExecutorError::InvalidPattern { .. } => "EXEC_INVALID_PATTERN",
            ExecutorError::InvalidData { .. } => "EXEC_INVALID_DATA",
            ExecutorError::WriteFailed { .. } => "EXEC_WRITE_FAILED",
            ExecutorError::Translate(err) => err.code(),
        }
    }
}
