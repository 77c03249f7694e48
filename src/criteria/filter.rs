//! Filter model
//!
//! A filter is either a single comparison on a field path or a boolean
//! composition of filters. Serialized filters carry a `kind` tag; an unknown
//! tag deserializes to [`Filter::Unrecognized`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operators for single filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleFilterOperator {
    Equal,
    NotEqual,
    Gt,
    Lt,
    Contains,
    NotContains,
    In,
    NotIn,
}

impl SingleFilterOperator {
    /// Returns the canonical serialization token
    pub fn token(&self) -> &'static str {
        match self {
            SingleFilterOperator::Equal => "=",
            SingleFilterOperator::NotEqual => "!=",
            SingleFilterOperator::Gt => ">",
            SingleFilterOperator::Lt => "<",
            SingleFilterOperator::Contains => "CONTAINS",
            SingleFilterOperator::NotContains => "NOT_CONTAINS",
            SingleFilterOperator::In => "IN",
            SingleFilterOperator::NotIn => "NOT_IN",
        }
    }

    /// Parses a serialization token. Unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(SingleFilterOperator::Equal),
            "!=" => Some(SingleFilterOperator::NotEqual),
            ">" => Some(SingleFilterOperator::Gt),
            "<" => Some(SingleFilterOperator::Lt),
            "CONTAINS" => Some(SingleFilterOperator::Contains),
            "NOT_CONTAINS" => Some(SingleFilterOperator::NotContains),
            "IN" => Some(SingleFilterOperator::In),
            "NOT_IN" => Some(SingleFilterOperator::NotIn),
            _ => None,
        }
    }

    /// Returns false for the negated operators
    pub fn is_positive(&self) -> bool {
        !matches!(
            self,
            SingleFilterOperator::NotEqual
                | SingleFilterOperator::NotContains
                | SingleFilterOperator::NotIn
        )
    }
}

impl fmt::Display for SingleFilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Serde adapter storing the operator as its token; unknown tokens become `None`.
mod operator_token {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::SingleFilterOperator;

    pub fn serialize<S: Serializer>(
        operator: &Option<SingleFilterOperator>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match operator {
            Some(op) => serializer.serialize_str(op.token()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SingleFilterOperator>, D::Error> {
        let token: Option<String> = Option::deserialize(deserializer)?;
        Ok(token.as_deref().and_then(SingleFilterOperator::from_token))
    }
}

/// Boolean composition operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundFilterOperator {
    And,
    Or,
}

impl CompoundFilterOperator {
    pub fn token(&self) -> &'static str {
        match self {
            CompoundFilterOperator::And => "and",
            CompoundFilterOperator::Or => "or",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "and" => Some(CompoundFilterOperator::And),
            "or" => Some(CompoundFilterOperator::Or),
            _ => None,
        }
    }
}

/// A comparison of one field against a scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleFilter {
    /// Attribute name or dot-separated path (`join.attribute`)
    pub field: String,
    /// `None` when the serialized token was not recognized
    #[serde(with = "operator_token", default)]
    pub operator: Option<SingleFilterOperator>,
    pub value: Value,
}

impl SingleFilter {
    pub fn new(field: impl Into<String>, operator: SingleFilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator: Some(operator),
            value,
        }
    }

    /// Returns true if the field traverses at least one join
    pub fn is_nested(&self) -> bool {
        self.field.contains('.')
    }
}

/// Renders `<field>.<operatorToken>.<value>`, e.g. `price.>.10`
impl fmt::Display for SingleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = self.operator.map(|op| op.token()).unwrap_or("?");
        match &self.value {
            Value::String(s) => write!(f, "{}.{}.{}", self.field, token, s),
            other => write!(f, "{}.{}.{}", self.field, token, other),
        }
    }
}

/// A boolean group of filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundFilter {
    pub operator: CompoundFilterOperator,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl CompoundFilter {
    pub fn and(filters: Vec<Filter>) -> Self {
        Self {
            operator: CompoundFilterOperator::And,
            filters,
        }
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Self {
            operator: CompoundFilterOperator::Or,
            filters,
        }
    }
}

/// A filter node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Filter {
    Single(SingleFilter),
    Compound(CompoundFilter),
    /// Unknown filter kind. Contributes no constraint.
    #[serde(other)]
    Unrecognized,
}

impl Filter {
    /// Shorthand for a single filter node
    pub fn single(field: impl Into<String>, operator: SingleFilterOperator, value: Value) -> Self {
        Filter::Single(SingleFilter::new(field, operator, value))
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::Compound(CompoundFilter::and(filters))
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Compound(CompoundFilter::or(filters))
    }

    /// Returns the kind name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Filter::Single(_) => "single",
            Filter::Compound(_) => "compound",
            Filter::Unrecognized => "unrecognized",
        }
    }
}
