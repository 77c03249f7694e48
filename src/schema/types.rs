//! Entity schema types
//!
//! Supported attribute types:
//! - i8, i16, i32, i64: signed integers
//! - f32, f64: floating point
//! - string: UTF-8 string
//! - bool: Boolean
//! - uuid: UUID rendered as a string

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Declared runtime type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    String,
    Bool,
    Uuid,
}

impl AttributeType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeType::I8 => "i8",
            AttributeType::I16 => "i16",
            AttributeType::I32 => "i32",
            AttributeType::I64 => "i64",
            AttributeType::F32 => "f32",
            AttributeType::F64 => "f64",
            AttributeType::String => "string",
            AttributeType::Bool => "bool",
            AttributeType::Uuid => "uuid",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            AttributeType::I8
                | AttributeType::I16
                | AttributeType::I32
                | AttributeType::I64
                | AttributeType::F32
                | AttributeType::F64
        )
    }
}

/// How many related rows a relation yields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    One,
    Many,
}

/// A navigable relation to another entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    /// Target entity name
    pub target: String,
    #[serde(default)]
    pub cardinality: Cardinality,
}

impl RelationDef {
    pub fn one(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            cardinality: Cardinality::One,
        }
    }

    pub fn many(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            cardinality: Cardinality::Many,
        }
    }
}

/// An entity: typed attributes plus relations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDef {
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeType>,
    #[serde(default)]
    pub relations: BTreeMap<String, RelationDef>,
}

impl EntityDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute_type: AttributeType) -> Self {
        self.attributes.insert(name.into(), attribute_type);
        self
    }

    pub fn with_relation(mut self, name: impl Into<String>, relation: RelationDef) -> Self {
        self.relations.insert(name.into(), relation);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<AttributeType> {
        self.attributes.get(name).copied()
    }

    pub fn relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.get(name)
    }

    /// Validates the entity structure itself (not a row)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Entity name must not be empty".into());
        }

        for name in self.attributes.keys().chain(self.relations.keys()) {
            if name.is_empty() || name.contains('.') {
                return Err(format!(
                    "Entity '{}' declares invalid member name '{}'",
                    self.name, name
                ));
            }
        }

        if let Some(name) = self
            .attributes
            .keys()
            .find(|name| self.relations.contains_key(*name))
        {
            return Err(format!(
                "Entity '{}' declares '{}' as both attribute and relation",
                self.name, name
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entity() -> EntityDef {
        EntityDef::new("products")
            .with_attribute("name", AttributeType::String)
            .with_attribute("price", AttributeType::F64)
            .with_relation("category", RelationDef::one("categories"))
    }

    #[test]
    fn test_entity_structure_valid() {
        assert!(sample_entity().validate_structure().is_ok());
    }

    #[test]
    fn test_dotted_member_rejected() {
        let entity = sample_entity().with_attribute("a.b", AttributeType::I32);
        assert!(entity.validate_structure().unwrap_err().contains("a.b"));
    }

    #[test]
    fn test_attribute_relation_clash_rejected() {
        let entity = sample_entity().with_attribute("category", AttributeType::String);
        assert!(entity.validate_structure().is_err());
    }

    #[test]
    fn test_numeric_types() {
        assert!(AttributeType::I8.is_numeric());
        assert!(AttributeType::F32.is_numeric());
        assert!(!AttributeType::String.is_numeric());
        assert!(!AttributeType::Uuid.is_numeric());
        assert_eq!(AttributeType::Bool.type_name(), "bool");
    }

    #[test]
    fn test_deserialize_entity() {
        let entity: EntityDef = serde_json::from_str(
            r#"{
                "name": "employees",
                "attributes": {"age": "i16", "salary": "f32"},
                "relations": {"dept": {"target": "departments"}}
            }"#,
        )
        .unwrap();

        assert_eq!(entity.attribute("age"), Some(AttributeType::I16));
        assert_eq!(entity.relation("dept").unwrap().cardinality, Cardinality::One);
    }
}
