//! Join declarations

use serde::{Deserialize, Serialize};

/// How a declared relation is traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
}

impl JoinType {
    pub fn is_inner(&self) -> bool {
        *self == JoinType::Inner
    }

    pub fn is_left(&self) -> bool {
        *self == JoinType::Left
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
        }
    }
}

/// Declares that a relation path must be joined before fields behind it
/// can be filtered or ordered on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaJoin {
    /// Dot-separated relation path, e.g. `orders.items`
    pub path: String,
    #[serde(default)]
    pub join_type: JoinType,
}

impl CriteriaJoin {
    pub fn inner(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            join_type: JoinType::Inner,
        }
    }

    pub fn left(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            join_type: JoinType::Left,
        }
    }

    /// Returns the relation names along the path
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        let join = CriteriaJoin::left("orders.items.product");
        let segments: Vec<&str> = join.segments().collect();
        assert_eq!(segments, vec!["orders", "items", "product"]);
        assert!(join.join_type.is_left());
    }

    #[test]
    fn test_join_type_defaults_to_inner() {
        let join: CriteriaJoin = serde_json::from_str(r#"{"path": "dept"}"#).unwrap();
        assert!(join.join_type.is_inner());
    }
}
