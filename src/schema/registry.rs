//! Entity registry
//!
//! Holds every entity a query root or join may reach. A registry file is a
//! JSON object `{"entities": [EntityDef, ...]}`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::types::EntityDef;

#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    entities: Vec<EntityDef>,
}

/// In-memory registry of entity definitions keyed by name
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, EntityDef>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a set of entities and validates relation targets
    pub fn from_entities(entities: impl IntoIterator<Item = EntityDef>) -> SchemaResult<Self> {
        let mut registry = Self::new();
        for entity in entities {
            registry.register(entity)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Parses a registry from JSON text
    pub fn from_json(location: &str, json: &str) -> SchemaResult<Self> {
        let file: RegistryFile =
            serde_json::from_str(json).map_err(|e| SchemaError::Malformed {
                location: location.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_entities(file.entities)
    }

    /// Loads a registry file from disk
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let location = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| SchemaError::Malformed {
            location: location.clone(),
            reason: e.to_string(),
        })?;
        Self::from_json(&location, &content)
    }

    /// Registers one entity. Relation targets are checked by [`validate`](Self::validate).
    pub fn register(&mut self, entity: EntityDef) -> SchemaResult<()> {
        entity
            .validate_structure()
            .map_err(SchemaError::InvalidEntity)?;

        if self.entities.contains_key(&entity.name) {
            return Err(SchemaError::DuplicateEntity(entity.name));
        }

        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Checks that every relation targets a registered entity
    pub fn validate(&self) -> SchemaResult<()> {
        let mut names: Vec<&String> = self.entities.keys().collect();
        names.sort();

        for name in names {
            let entity = &self.entities[name];
            for (relation, def) in &entity.relations {
                if !self.entities.contains_key(&def.target) {
                    return Err(SchemaError::DanglingRelation {
                        entity: entity.name.clone(),
                        relation: relation.clone(),
                        target: def.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeType, RelationDef};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn departments() -> EntityDef {
        EntityDef::new("departments").with_attribute("name", AttributeType::String)
    }

    fn employees() -> EntityDef {
        EntityDef::new("employees")
            .with_attribute("age", AttributeType::I32)
            .with_relation("dept", RelationDef::one("departments"))
    }

    #[test]
    fn test_register_and_get() {
        let registry = EntityRegistry::from_entities([departments(), employees()]).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("employees"));
        assert!(registry.get("employees").unwrap().relation("dept").is_some());
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = EntityRegistry::from_entities([departments(), departments()]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateEntity("departments".into()));
    }

    #[test]
    fn test_dangling_relation_rejected() {
        let err = EntityRegistry::from_entities([employees()]).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_DANGLING_RELATION");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"entities": [{{"name": "tags", "attributes": {{"label": "string"}}}}]}}"#
        )
        .unwrap();

        let registry = EntityRegistry::load(file.path()).unwrap();
        assert_eq!(
            registry.get("tags").unwrap().attribute("label"),
            Some(AttributeType::String)
        );
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = EntityRegistry::from_json("inline", "{not json").unwrap_err();
        assert_eq!(err.code(), "SCHEMA_MALFORMED");
    }
}
