//! Predicate evaluation over joined tuples
//!
//! A tuple binds the root row and one related row (or nothing) per join
//! clause. Missing and null attribute values never satisfy a comparison,
//! negated or not.

use std::cmp::Ordering;
use std::collections::HashMap;

use regex::Regex;
use serde_json::{Number, Value};

use crate::translator::{value_text, AttributeRef, Operand, Predicate, Source};

use super::errors::{ExecutorError, ExecutorResult};

/// One row combination produced by expanding the query's joins
#[derive(Debug, Clone)]
pub struct Tuple<'r> {
    root: &'r Value,
    joined: Vec<Option<&'r Value>>,
}

impl<'r> Tuple<'r> {
    pub fn new(root: &'r Value) -> Self {
        Self {
            root,
            joined: Vec::new(),
        }
    }

    /// Tuple extended with the binding for the next join clause
    pub fn with_binding(&self, row: Option<&'r Value>) -> Self {
        let mut joined = self.joined.clone();
        joined.push(row);
        Self {
            root: self.root,
            joined,
        }
    }

    pub fn root(&self) -> &'r Value {
        self.root
    }

    /// Row bound to a source; `None` for an unmatched LEFT join
    pub fn row(&self, source: Source) -> Option<&'r Value> {
        match source {
            Source::Root => Some(self.root),
            Source::Join(handle) => self.joined.get(handle.index()).copied().flatten(),
        }
    }

    /// Attribute value, `None` when missing or null
    pub fn attribute(&self, attribute: &AttributeRef) -> Option<&'r Value> {
        self.row(attribute.source)
            .and_then(|row| row.get(&attribute.name))
            .filter(|value| !value.is_null())
    }
}

/// Evaluates one predicate tree; LIKE patterns are compiled once up front
pub struct PredicateEvaluator {
    patterns: HashMap<String, Regex>,
}

impl PredicateEvaluator {
    pub fn new(predicate: &Predicate) -> ExecutorResult<Self> {
        let mut patterns = HashMap::new();
        Self::compile_patterns(predicate, &mut patterns)?;
        Ok(Self { patterns })
    }

    fn compile_patterns(
        predicate: &Predicate,
        patterns: &mut HashMap<String, Regex>,
    ) -> ExecutorResult<()> {
        match predicate {
            Predicate::And(children) | Predicate::Or(children) => {
                for child in children {
                    Self::compile_patterns(child, patterns)?;
                }
            }
            Predicate::Not(inner) => Self::compile_patterns(inner, patterns)?,
            Predicate::Like { pattern, .. } if !patterns.contains_key(pattern) => {
                let regex = like_to_regex(pattern)?;
                patterns.insert(pattern.clone(), regex);
            }
            _ => {}
        }
        Ok(())
    }

    /// True when the predicate holds for the tuple; unknown counts as false
    pub fn matches(&self, predicate: &Predicate, tuple: &Tuple<'_>) -> bool {
        self.truth(predicate, tuple) == Some(true)
    }

    /// Three-valued truth of a predicate; `None` is unknown.
    ///
    /// A comparison on a missing or null attribute is unknown, and `NOT`
    /// keeps it unknown, so negated operators never match such rows either.
    pub fn truth(&self, predicate: &Predicate, tuple: &Tuple<'_>) -> Option<bool> {
        match predicate {
            Predicate::True => Some(true),
            Predicate::And(children) => {
                let mut result = Some(true);
                for child in children {
                    match self.truth(child, tuple) {
                        Some(false) => return Some(false),
                        None => result = None,
                        Some(true) => {}
                    }
                }
                result
            }
            Predicate::Or(children) => {
                let mut result = Some(false);
                for child in children {
                    match self.truth(child, tuple) {
                        Some(true) => return Some(true),
                        None => result = None,
                        Some(false) => {}
                    }
                }
                result
            }
            Predicate::Not(inner) => self.truth(inner, tuple).map(|holds| !holds),
            Predicate::Equal { attribute, operand } => {
                let ord = compare_operand(tuple.attribute(attribute)?, operand)?;
                Some(ord == Ordering::Equal)
            }
            Predicate::NotEqual { attribute, operand } => {
                let ord = compare_operand(tuple.attribute(attribute)?, operand)?;
                Some(ord != Ordering::Equal)
            }
            Predicate::GreaterThan { attribute, bound } => {
                let ord = bound.compare(number(tuple.attribute(attribute)?)?)?;
                Some(ord == Ordering::Greater)
            }
            Predicate::LessThan { attribute, bound } => {
                let ord = bound.compare(number(tuple.attribute(attribute)?)?)?;
                Some(ord == Ordering::Less)
            }
            Predicate::Like { attribute, pattern } => {
                let actual = tuple.attribute(attribute)?;
                let regex = self.patterns.get(pattern)?;
                Some(regex.is_match(&value_text(actual)))
            }
            Predicate::In { attribute, values } => {
                let actual = value_text(tuple.attribute(attribute)?);
                Some(values.iter().any(|v| *v == actual))
            }
        }
    }
}

fn number(value: &Value) -> Option<&Number> {
    match value {
        Value::Number(n) => Some(n),
        _ => None,
    }
}

/// `Some(Equal)` / `Some(Less|Greater)` when comparable, `None` otherwise
fn compare_operand(actual: &Value, operand: &Operand) -> Option<Ordering> {
    match operand {
        Operand::Numeric(bound) => number(actual).and_then(|n| bound.compare(n)),
        Operand::Literal(expected) if actual == expected => Some(Ordering::Equal),
        // Unequal literals only need to be told apart
        Operand::Literal(_) => Some(Ordering::Less),
    }
}

/// Translates a LIKE pattern into an anchored regex.
///
/// `%` matches any run, `_` any single character, `\` escapes the next one.
pub fn like_to_regex(pattern: &str) -> ExecutorResult<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?s)^");

    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            '\\' => {
                let literal = chars.next().unwrap_or('\\');
                source.push_str(&regex::escape(&literal.to_string()));
            }
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');

    Regex::new(&source).map_err(|e| ExecutorError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeType;
    use crate::translator::{JoinHandle, NumericBound};
    use serde_json::json;

    fn attr(name: &str, attribute_type: AttributeType) -> AttributeRef {
        AttributeRef {
            source: Source::Root,
            name: name.to_string(),
            attribute_type,
            path: name.to_string(),
        }
    }

    fn eval(predicate: &Predicate, row: &Value) -> bool {
        PredicateEvaluator::new(predicate)
            .unwrap()
            .matches(predicate, &Tuple::new(row))
    }

    #[test]
    fn test_like_wildcards() {
        let regex = like_to_regex("%lamp%").unwrap();
        assert!(regex.is_match("desk lamp"));
        assert!(regex.is_match("lamp"));
        assert!(!regex.is_match("lam"));

        let regex = like_to_regex("a_c").unwrap();
        assert!(regex.is_match("abc"));
        assert!(!regex.is_match("abbc"));
    }

    #[test]
    fn test_like_escapes() {
        let regex = like_to_regex("%50\\%%").unwrap();
        assert!(regex.is_match("save 50% now"));
        assert!(!regex.is_match("save 500 now"));

        let regex = like_to_regex("a.c").unwrap();
        assert!(!regex.is_match("abc"));
    }

    #[test]
    fn test_gt_excludes_boundary() {
        let gt = |bound| Predicate::GreaterThan {
            attribute: attr("q", AttributeType::I32),
            bound,
        };
        let row = json!({"q": 10});
        assert!(!eval(&gt(NumericBound::I32(10)), &row));
        assert!(eval(&gt(NumericBound::I32(9)), &row));
    }

    #[test]
    fn test_null_never_matches() {
        let row = json!({"q": null});
        let gt = Predicate::GreaterThan {
            attribute: attr("q", AttributeType::I32),
            bound: NumericBound::I32(0),
        };
        let ne = Predicate::NotEqual {
            attribute: attr("q", AttributeType::I32),
            operand: Operand::Numeric(NumericBound::I32(1)),
        };
        let missing = Predicate::Equal {
            attribute: attr("other", AttributeType::String),
            operand: Operand::Literal(json!("x")),
        };
        assert!(!eval(&gt, &row));
        assert!(!eval(&ne, &row));
        assert!(!eval(&missing, &row));
    }

    #[test]
    fn test_negation_of_null_stays_unknown() {
        let row = json!({"name": null});
        let like = Predicate::Like {
            attribute: attr("name", AttributeType::String),
            pattern: "%a%".into(),
        };
        let not_like = Predicate::negate(like.clone());
        let ne = Predicate::NotEqual {
            attribute: attr("name", AttributeType::String),
            operand: Operand::Literal(json!("a")),
        };

        assert!(!eval(&like, &row));
        assert!(!eval(&not_like, &row));
        assert!(!eval(&ne, &row));
        assert!(!eval(&Predicate::negate(ne), &row));
    }

    #[test]
    fn test_unknown_in_groups() {
        let row = json!({"a": 1});
        let unknown = Predicate::Equal {
            attribute: attr("missing", AttributeType::I32),
            operand: Operand::Numeric(NumericBound::I32(1)),
        };
        let holds = Predicate::Equal {
            attribute: attr("a", AttributeType::I32),
            operand: Operand::Numeric(NumericBound::I32(1)),
        };
        let evaluator = PredicateEvaluator::new(&Predicate::True).unwrap();
        let tuple = Tuple::new(&row);

        let or = Predicate::Or(vec![unknown.clone(), holds.clone()]);
        let and = Predicate::And(vec![unknown.clone(), holds]);
        assert_eq!(evaluator.truth(&or, &tuple), Some(true));
        assert_eq!(evaluator.truth(&and, &tuple), None);
        assert_eq!(evaluator.truth(&Predicate::negate(and), &tuple), None);
        assert_eq!(evaluator.truth(&Predicate::Or(vec![]), &tuple), Some(false));
    }

    #[test]
    fn test_equal_literal_and_numeric() {
        let row = json!({"name": "lamp", "price": 2.0});
        let name_eq = Predicate::Equal {
            attribute: attr("name", AttributeType::String),
            operand: Operand::Literal(json!("lamp")),
        };
        let price_eq = Predicate::Equal {
            attribute: attr("price", AttributeType::F64),
            operand: Operand::Numeric(NumericBound::F64(2.0)),
        };
        let name_ne = Predicate::NotEqual {
            attribute: attr("name", AttributeType::String),
            operand: Operand::Literal(json!("desk")),
        };
        assert!(eval(&name_eq, &row));
        assert!(eval(&price_eq, &row));
        assert!(eval(&name_ne, &row));
    }

    #[test]
    fn test_in_list() {
        let predicate = Predicate::In {
            attribute: attr("code", AttributeType::String),
            values: vec!["a".into(), "b".into(), "c".into()],
        };
        for code in ["a", "b", "c"] {
            assert!(eval(&predicate, &json!({ "code": code })));
        }
        assert!(!eval(&predicate, &json!({"code": "d"})));
        assert!(!eval(&predicate, &json!({"code": "a,b"})));
    }

    #[test]
    fn test_unbound_join_reads_nothing() {
        let row = json!({"name": "x"});
        let tuple = Tuple::new(&row).with_binding(None);
        let joined = AttributeRef {
            source: Source::Join(JoinHandle(0)),
            name: "name".into(),
            attribute_type: AttributeType::String,
            path: "dept.name".into(),
        };
        assert_eq!(tuple.attribute(&joined), None);
        assert_eq!(tuple.row(Source::Root), Some(&row));
    }
}
