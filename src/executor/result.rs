//! Result types for query execution

use serde::Serialize;
use serde_json::Value;

/// Result of query execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    /// Root rows in result order, one per matched tuple inside the window
    pub rows: Vec<Value>,
    /// Number of root rows scanned
    pub scanned_count: usize,
    /// Number of tuples satisfying the predicate, ignoring the window
    pub matched_count: usize,
    /// Number of rows returned
    pub returned_count: usize,
    /// Whether the limit cut matching tuples
    pub limit_applied: bool,
}

impl ExecutionResult {
    /// Returns true if no rows were returned
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows returned
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_len() {
        let result = ExecutionResult {
            rows: vec![json!({"id": 1}), json!({"id": 2})],
            scanned_count: 5,
            matched_count: 3,
            returned_count: 2,
            limit_applied: true,
        };
        assert_eq!(result.len(), 2);
        assert!(!result.is_empty());
    }
}
