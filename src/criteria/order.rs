//! Ordering clause of a criteria

use serde::{Deserialize, Serialize};

/// Sort direction. `None` means no ordering clause is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Asc,
    Desc,
    #[default]
    None,
}

impl OrderType {
    pub fn is_none(&self) -> bool {
        *self == OrderType::None
    }

    pub fn is_asc(&self) -> bool {
        *self == OrderType::Asc
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Asc => "asc",
            OrderType::Desc => "desc",
            OrderType::None => "none",
        }
    }
}

/// Ordering on a single field (possibly behind a join)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub direction: OrderType,
}

impl Order {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderType::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderType::Desc,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn has_order(&self) -> bool {
        !self.direction.is_none()
    }
}
