//! Result sorting for query execution
//!
//! Sorts matched tuples by the ordering clause, deterministically.

use std::cmp::Ordering;

use serde_json::Value;

use crate::translator::{OrderClause, SortDirection};

use super::evaluator::Tuple;

/// Sorts matched tuples
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts tuples according to the ordering clause.
    ///
    /// Sort is stable; missing and null values come first ascending.
    pub fn sort(tuples: &mut [Tuple<'_>], order: &OrderClause) {
        tuples.sort_by(|a, b| {
            let ordering = Self::compare_values(
                a.attribute(&order.attribute),
                b.attribute(&order.attribute),
            );

            match order.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    /// Compares two JSON values for sorting.
    ///
    /// Ordering rules:
    /// - absent < bool < number < string
    /// - For same types, natural ordering
    pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                let a_type = type_order(a_val);
                let b_type = type_order(b_val);
                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                match (a_val, b_val) {
                    (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                    (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
                        (Some(xi), Some(yi)) => xi.cmp(&yi),
                        _ => {
                            let xf = x.as_f64().unwrap_or(0.0);
                            let yf = y.as_f64().unwrap_or(0.0);
                            xf.partial_cmp(&yf).unwrap_or(Ordering::Equal)
                        }
                    },
                    (Value::String(x), Value::String(y)) => x.cmp(y),
                    _ => Ordering::Equal,
                }
            }
        }
    }
}
