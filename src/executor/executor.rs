//! Query execution port
//!
//! Execution flow over in-memory rows (strict order):
//! 1. Expand each root row into tuples along the join clauses
//! 2. Keep tuples satisfying the predicate
//! 3. Apply ordering (if specified)
//! 4. Apply offset, then limit
//! 5. Project each tuple back to its root row

use serde_json::Value;

use crate::criteria::{Page, Pagination};
use crate::schema::Cardinality;
use crate::translator::{ExecutableQuery, JoinClause};

use super::errors::ExecutorResult;
use super::evaluator::{PredicateEvaluator, Tuple};
use super::result::ExecutionResult;
use super::sorter::ResultSorter;

/// Storage engine able to run translated queries
pub trait QueryExecutor {
    /// Runs a query, honoring its window
    fn execute(&self, query: &ExecutableQuery) -> ExecutorResult<ExecutionResult>;

    /// Rows of a query, honoring its window
    fn fetch(&self, query: &ExecutableQuery) -> ExecutorResult<Vec<Value>> {
        self.execute(query).map(|result| result.rows)
    }

    /// Total matches, ignoring the window
    fn count(&self, query: &ExecutableQuery) -> ExecutorResult<u64> {
        self.execute(&query.unbounded())
            .map(|result| result.matched_count as u64)
    }

    /// One page of rows plus totals. The page window replaces the query's.
    fn fetch_page(
        &self,
        query: &ExecutableQuery,
        pagination: Pagination,
    ) -> ExecutorResult<Page<Value>> {
        let windowed = ExecutableQuery {
            offset: Some(pagination.offset()),
            limit: Some(pagination.limit),
            ..query.clone()
        };
        let result = self.execute(&windowed)?;
        Ok(Page::new(
            result.rows,
            pagination,
            result.matched_count as u64,
        ))
    }
}

/// Storage engine accepting new rows
pub trait RowWriter {
    /// Appends one row to a collection
    fn write_row(&mut self, collection: &str, row: Value) -> ExecutorResult<()>;
}

/// Runs a query over the root collection's rows
pub fn run_query(rows: &[Value], query: &ExecutableQuery) -> ExecutorResult<ExecutionResult> {
    let evaluator = PredicateEvaluator::new(&query.predicate)?;

    // Steps 1-2
    let mut matched = Vec::new();
    for row in rows {
        matched.extend(
            expand(row, &query.joins)
                .into_iter()
                .filter(|tuple| evaluator.matches(&query.predicate, tuple)),
        );
    }
    let matched_count = matched.len();

    // Step 3
    if let Some(order) = &query.order {
        ResultSorter::sort(&mut matched, order);
    }

    // Steps 4-5
    let offset = query.offset.unwrap_or(0) as usize;
    let limit = query.limit.map_or(usize::MAX, |l| l as usize);
    let rows_out: Vec<Value> = matched
        .iter()
        .skip(offset)
        .take(limit)
        .map(|tuple| tuple.root().clone())
        .collect();

    Ok(ExecutionResult {
        limit_applied: matched_count.saturating_sub(offset) > rows_out.len(),
        returned_count: rows_out.len(),
        scanned_count: rows.len(),
        matched_count,
        rows: rows_out,
    })
}

/// Expands one root row into a tuple per combination of related rows.
///
/// INNER joins drop tuples without a related row; LEFT joins keep them with
/// an empty binding.
fn expand<'r>(row: &'r Value, joins: &[JoinClause]) -> Vec<Tuple<'r>> {
    let mut tuples = vec![Tuple::new(row)];

    for clause in joins {
        let mut next = Vec::with_capacity(tuples.len());
        for tuple in &tuples {
            let related = related_rows(tuple.row(clause.parent), clause);
            if related.is_empty() {
                if clause.join_type.is_left() {
                    next.push(tuple.with_binding(None));
                }
                continue;
            }
            for related_row in related {
                next.push(tuple.with_binding(Some(related_row)));
            }
        }
        tuples = next;
    }

    tuples
}

/// Inline related rows: an object for ONE relations, an array for MANY
fn related_rows<'r>(parent: Option<&'r Value>, clause: &JoinClause) -> Vec<&'r Value> {
    let value = match parent.and_then(|p| p.get(&clause.relation)) {
        Some(value) => value,
        None => return Vec::new(),
    };

    match (clause.cardinality, value) {
        (Cardinality::One, Value::Object(_)) => vec![value],
        (Cardinality::Many, Value::Array(items)) => {
            items.iter().filter(|item| item.is_object()).collect()
        }
        _ => Vec::new(),
    }
}
