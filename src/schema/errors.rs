//! Schema registry errors

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while building an entity registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Schema source could not be read or parsed
    #[error("Malformed schema at {location}: {reason}")]
    Malformed { location: String, reason: String },

    /// Entity structure is invalid
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    /// Entity name registered twice
    #[error("Entity '{0}' is already registered")]
    DuplicateEntity(String),

    /// Relation points at an entity that is not registered
    #[error("Relation '{entity}.{relation}' targets unknown entity '{target}'")]
    DanglingRelation {
        entity: String,
        relation: String,
        target: String,
    },
}

impl SchemaError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Malformed { .. } => "SCHEMA_MALFORMED",
            SchemaError::InvalidEntity(_) => "SCHEMA_INVALID_ENTITY",
            SchemaError::DuplicateEntity(_) => "SCHEMA_DUPLICATE_ENTITY",
            SchemaError::DanglingRelation { .. } => "SCHEMA_DANGLING_RELATION",
        }
    }
}
