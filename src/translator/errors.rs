//! Translation error types
//!
//! Error codes:
//! - CRITERIA_UNRESOLVED_JOIN
//! - CRITERIA_UNSUPPORTED_OPERATOR
//! - CRITERIA_INVALID_FILTER_VALUE
//! - CRITERIA_UNSUPPORTED_ATTRIBUTE_TYPE
//! - CRITERIA_UNKNOWN_ENTITY
//! - CRITERIA_UNKNOWN_ATTRIBUTE
//! - CRITERIA_UNKNOWN_RELATION

use thiserror::Error;

/// Result type for translation
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Errors raised while turning criteria into a query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// Field path references a join that was never declared
    #[error("Join '{path}' is not declared in the criteria")]
    UnresolvedJoin { path: String },

    /// No predicate builder exists for the operator
    #[error("Operator '{operator}' is not supported")]
    UnsupportedOperator { operator: String },

    /// Filter value has the wrong shape for the operator
    #[error("Operator '{operator}' cannot take value {value}")]
    InvalidFilterValue { operator: String, value: String },

    /// Attribute type has no numeric coercion
    #[error("Attribute '{attribute}' of type {type_name} cannot be compared numerically")]
    UnsupportedAttributeType {
        attribute: String,
        type_name: String,
    },

    /// Root entity is not registered
    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),

    /// Attribute is not declared on the entity it resolves to
    #[error("Unknown attribute '{attribute}' on entity '{entity}'")]
    UnknownAttribute { entity: String, attribute: String },

    /// Relation is not declared on the entity a join segment starts from
    #[error("Unknown relation '{relation}' on entity '{entity}'")]
    UnknownRelation { entity: String, relation: String },
}

impl TranslateError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TranslateError::UnresolvedJoin { .. } => "CRITERIA_UNRESOLVED_JOIN",
            TranslateError::UnsupportedOperator { .. } => "CRITERIA_UNSUPPORTED_OPERATOR",
            TranslateError::InvalidFilterValue { .. } => "CRITERIA_INVALID_FILTER_VALUE",
            TranslateError::UnsupportedAttributeType { .. } => {
                "CRITERIA_UNSUPPORTED_ATTRIBUTE_TYPE"
            }
            TranslateError::UnknownEntity(_) => "CRITERIA_UNKNOWN_ENTITY",
            TranslateError::UnknownAttribute { .. } => "CRITERIA_UNKNOWN_ATTRIBUTE",
            TranslateError::UnknownRelation { .. } => "CRITERIA_UNKNOWN_RELATION",
        }
    }

    /// Returns true if the criteria is at fault rather than the schema lookup
    pub fn is_filter_error(&self) -> bool {
        matches!(
            self,
            TranslateError::UnsupportedOperator { .. }
                | TranslateError::InvalidFilterValue { .. }
                | TranslateError::UnsupportedAttributeType { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = TranslateError::UnresolvedJoin {
            path: "dept.manager".into(),
        };
        assert_eq!(err.code(), "CRITERIA_UNRESOLVED_JOIN");
        assert_eq!(err.to_string(), "Join 'dept.manager' is not declared in the criteria");

        let err = TranslateError::UnsupportedOperator {
            operator: "NOT_IN".into(),
        };
        assert_eq!(err.code(), "CRITERIA_UNSUPPORTED_OPERATOR");
        assert!(err.is_filter_error());

        assert!(!TranslateError::UnknownEntity("ghost".into()).is_filter_error());
    }
}
