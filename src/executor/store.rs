//! In-memory storage engine
//!
//! Collections of JSON rows keyed by root entity name. Related rows are
//! stored inline: an object for ONE relations, an array for MANY. A data file
//! is a JSON object mapping collection names to arrays of rows.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::observability::{Event, Logger};
use crate::schema::EntityRegistry;
use crate::translator::{build_query, ExecutableQuery, Specification};

use super::errors::{ExecutorError, ExecutorResult};
use super::executor::{run_query, QueryExecutor, RowWriter};
use super::result::ExecutionResult;

/// Row store backing the execution port
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an empty collection
    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        self.collections.entry(name.into()).or_default();
        self
    }

    /// Appends one row, creating the collection if needed
    pub fn insert(&mut self, collection: impl Into<String>, row: Value) {
        self.collections.entry(collection.into()).or_default().push(row);
    }

    /// Parses a store from JSON text
    pub fn from_json(location: &str, json: &str) -> ExecutorResult<Self> {
        let invalid = |reason: String| ExecutorError::InvalidData {
            location: location.to_string(),
            reason,
        };

        let parsed: HashMap<String, Vec<Value>> =
            serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;

        for (name, rows) in &parsed {
            if let Some(index) = rows.iter().position(|row| !row.is_object()) {
                return Err(invalid(format!(
                    "row {} of collection '{}' is not an object",
                    index, name
                )));
            }
        }

        Ok(Self { collections: parsed })
    }

    /// Loads a data file from disk
    pub fn load(path: &Path) -> ExecutorResult<Self> {
        let location = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| ExecutorError::InvalidData {
            location: location.clone(),
            reason: e.to_string(),
        })?;
        Self::from_json(&location, &content)
    }

    /// Writes the store to disk as a data file, collections sorted by name
    pub fn save(&self, path: &Path) -> ExecutorResult<()> {
        let failed = |reason: String| ExecutorError::WriteFailed {
            location: path.display().to_string(),
            reason,
        };

        let sorted: BTreeMap<&String, &Vec<Value>> = self.collections.iter().collect();
        let json = serde_json::to_string_pretty(&sorted).map_err(|e| failed(e.to_string()))?;
        fs::write(path, json).map_err(|e| failed(e.to_string()))
    }

    pub fn rows(&self, collection: &str) -> Option<&[Value]> {
        self.collections.get(collection).map(Vec::as_slice)
    }

    /// Number of rows in a collection (0 if absent)
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.values().all(Vec::is_empty)
    }

    /// Runs a declarative specification rooted at `root`
    pub fn find_all(
        &self,
        spec: &dyn Specification,
        registry: &EntityRegistry,
        root: &str,
    ) -> ExecutorResult<Vec<Value>> {
        let query = build_query(spec, registry, root)?;
        self.fetch(&query)
    }
}

impl QueryExecutor for MemoryStore {
    fn execute(&self, query: &ExecutableQuery) -> ExecutorResult<ExecutionResult> {
        let result = self
            .rows(&query.root)
            .ok_or_else(|| ExecutorError::UnknownCollection(query.root.clone()))
            .and_then(|rows| run_query(rows, query));

        match &result {
            Ok(result) => {
                let scanned = result.scanned_count.to_string();
                let matched = result.matched_count.to_string();
                let returned = result.returned_count.to_string();
                Logger::trace(
                    Event::QueryExecuted,
                    &[
                        ("root", query.root.as_str()),
                        ("scanned", scanned.as_str()),
                        ("matched", matched.as_str()),
                        ("returned", returned.as_str()),
                    ],
                );
            }
            Err(err) => {
                let reason = err.to_string();
                Logger::error(
                    Event::QueryFailed,
                    &[
                        ("root", query.root.as_str()),
                        ("code", err.code()),
                        ("reason", reason.as_str()),
                    ],
                );
            }
        }

        result
    }
}

impl RowWriter for MemoryStore {
    fn write_row(&mut self, collection: &str, row: Value) -> ExecutorResult<()> {
        if !row.is_object() {
            return Err(ExecutorError::InvalidData {
                location: collection.to_string(),
                reason: "row is not an object".to_string(),
            });
        }
        self.insert(collection, row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{Criteria, Filter, Order, Pagination, SingleFilterOperator};
    use crate::translator::{sample_registry, CriteriaSpecification, QueryTranslator};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        for (i, age) in [31, 45, 22, 38].into_iter().enumerate() {
            store.insert("employee", json!({"id": i, "name": format!("e{}", i), "age": age}));
        }
        store
    }

    #[test]
    fn test_unknown_collection() {
        let registry = sample_registry();
        let query = QueryTranslator::with_shared_factory(&registry)
            .translate(&Criteria::default(), "project")
            .unwrap();

        let err = MemoryStore::new().fetch(&query).unwrap_err();
        assert_eq!(err, ExecutorError::UnknownCollection("project".into()));

        let empty = MemoryStore::new().with_collection("project");
        assert!(empty.fetch(&query).unwrap().is_empty());
    }

    #[test]
    fn test_count_ignores_window() {
        let registry = sample_registry();
        let criteria = Criteria::new(
            vec![Filter::single("age", SingleFilterOperator::Gt, json!(30))],
            Order::asc("age"),
        )
        .with_limit(1);
        let query = QueryTranslator::with_shared_factory(&registry)
            .translate(&criteria, "employee")
            .unwrap();

        let store = store();
        assert_eq!(store.fetch(&query).unwrap(), vec![store.rows("employee").unwrap()[0].clone()]);
        assert_eq!(store.count(&query).unwrap(), 3);
    }

    #[test]
    fn test_fetch_page() {
        let registry = sample_registry();
        let query = QueryTranslator::with_shared_factory(&registry)
            .translate(&Criteria::new(vec![], Order::desc("age")), "employee")
            .unwrap();

        let page = store()
            .fetch_page(&query, Pagination { limit: 3, page: 1 })
            .unwrap();
        assert_eq!(page.total_elements, 4);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.content, vec![json!({"id": 2, "name": "e2", "age": 22})]);
    }

    #[test]
    fn test_find_all_specification() {
        let registry = sample_registry();
        let criteria = Criteria::new(
            vec![Filter::single("age", SingleFilterOperator::Lt, json!(35))],
            Order::asc("age"),
        );

        let rows = store()
            .find_all(&CriteriaSpecification::from_criteria(&criteria), &registry, "employee")
            .unwrap();
        let ages: Vec<i64> = rows.iter().map(|r| r["age"].as_i64().unwrap()).collect();
        assert_eq!(ages, vec![22, 31]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"employee": [{{"id": 1}}, {{"id": 2}}], "project": []}}"#).unwrap();

        let store = MemoryStore::load(file.path()).unwrap();
        assert_eq!(store.len("employee"), 2);
        assert_eq!(store.len("project"), 0);
        assert!(store.rows("project").is_some());
    }

    #[test]
    fn test_write_row_then_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let mut store = store();
        store.write_row("project", json!({"title": "apollo"})).unwrap();
        assert_eq!(
            store.write_row("project", json!("apollo")).unwrap_err().code(),
            "EXEC_INVALID_DATA"
        );
        store.save(&path).unwrap();

        let reloaded = MemoryStore::load(&path).unwrap();
        assert_eq!(reloaded.len("employee"), 4);
        assert_eq!(reloaded.rows("project").unwrap(), &[json!({"title": "apollo"})]);
    }

    #[test]
    fn test_save_to_missing_directory() {
        let err = store()
            .save(Path::new("/nonexistent/dir/data.json"))
            .unwrap_err();
        assert_eq!(err.code(), "EXEC_WRITE_FAILED");
    }

    #[test]
    fn test_non_object_row_rejected() {
        let err = MemoryStore::from_json("inline", r#"{"employee": [1]}"#).unwrap_err();
        assert_eq!(err.code(), "EXEC_INVALID_DATA");
    }
}
