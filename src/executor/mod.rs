//! Query execution
//!
//! The [`QueryExecutor`] port runs translated queries; [`MemoryStore`] is the
//! in-memory engine behind it.
//!
//! # Execution Flow (strict order)
//!
//! 1. Expand root rows along the join clauses into tuples
//! 2. Filter tuples by the predicate tree
//! 3. Apply ordering (if specified)
//! 4. Apply offset and limit
//! 5. Return one root row per surviving tuple
//!
//! Same query + same rows = same results.

mod errors;
mod evaluator;
mod executor;
mod result;
mod sorter;
mod store;

pub use errors::{ExecutorError, ExecutorResult};
pub use evaluator::{like_to_regex, PredicateEvaluator, Tuple};
pub use executor::{run_query, QueryExecutor, RowWriter};
pub use result::ExecutionResult;
pub use sorter::ResultSorter;
pub use store::MemoryStore;
