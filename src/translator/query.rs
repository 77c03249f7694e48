//! Executable query descriptor
//!
//! The translator's output. It names the root entity, the join clauses in
//! creation order, the WHERE predicate tree, an optional ordering clause and
//! the result window. Nothing in here is executed by the translator.

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Number, Value};

use crate::criteria::JoinType;
use crate::schema::{AttributeType, Cardinality};

/// Opaque reference to a join clause of one query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JoinHandle(pub(crate) usize);

impl JoinHandle {
    /// Position of the clause in [`ExecutableQuery::joins`]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Where an attribute or a join hangs off: the query root or a join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Root,
    Join(JoinHandle),
}

/// A relation traversal attached to the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    /// Fully-qualified path from the root, e.g. `orders.items`
    pub path: String,
    pub parent: Source,
    /// Relation name on the parent entity (last path segment)
    pub relation: String,
    /// Entity reached by the join
    pub entity: String,
    pub join_type: JoinType,
    pub cardinality: Cardinality,
}

/// A resolved attribute, possibly behind a join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRef {
    pub source: Source,
    /// Attribute name on the source entity
    pub name: String,
    pub attribute_type: AttributeType,
    /// Field path as written in the criteria
    pub path: String,
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// A comparison value coerced to the attribute's numeric type.
///
/// Values the attribute type cannot hold exactly (out of range, or fractional
/// for an integer type) stay [`NumericBound::Wide`].
#[derive(Debug, Clone, PartialEq)]
pub enum NumericBound {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// The value as written, outside the attribute's type
    Wide(Number),
}

impl NumericBound {
    /// Orders a stored number against this bound (`actual.cmp(bound)`).
    ///
    /// The comparison is exact across integer and float representations.
    /// Returns `None` for NaN operands.
    pub fn compare(&self, actual: &Number) -> Option<Ordering> {
        let bound = match self {
            NumericBound::I8(b) => Exact::Int(i128::from(*b)),
            NumericBound::I16(b) => Exact::Int(i128::from(*b)),
            NumericBound::I32(b) => Exact::Int(i128::from(*b)),
            NumericBound::I64(b) => Exact::Int(i128::from(*b)),
            NumericBound::F32(b) => Exact::Float(f64::from(*b)),
            NumericBound::F64(b) => Exact::Float(*b),
            NumericBound::Wide(n) => Exact::of(n)?,
        };
        Exact::of(actual)?.compare(bound)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            NumericBound::I8(_) => "i8",
            NumericBound::I16(_) => "i16",
            NumericBound::I32(_) => "i32",
            NumericBound::I64(_) => "i64",
            NumericBound::F32(_) => "f32",
            NumericBound::F64(_) => "f64",
            NumericBound::Wide(_) => "number",
        }
    }
}

/// A JSON number without loss: every i64 and u64 fits an i128
#[derive(Debug, Clone, Copy)]
enum Exact {
    Int(i128),
    Float(f64),
}

impl Exact {
    fn of(n: &Number) -> Option<Exact> {
        if let Some(i) = n.as_i64() {
            return Some(Exact::Int(i128::from(i)));
        }
        if let Some(u) = n.as_u64() {
            return Some(Exact::Int(i128::from(u)));
        }
        n.as_f64().filter(|f| !f.is_nan()).map(Exact::Float)
    }

    fn compare(self, other: Exact) -> Option<Ordering> {
        match (self, other) {
            (Exact::Int(a), Exact::Int(b)) => Some(a.cmp(&b)),
            (Exact::Float(a), Exact::Float(b)) => a.partial_cmp(&b),
            (Exact::Int(a), Exact::Float(b)) => compare_int_float(a, b),
            (Exact::Float(a), Exact::Int(b)) => compare_int_float(b, a).map(Ordering::reverse),
        }
    }
}

/// Orders an integer against a float without rounding either
fn compare_int_float(int: i128, float: f64) -> Option<Ordering> {
    // Beyond any i64/u64
    const LIMIT: f64 = 1e20;

    if float.is_nan() {
        return None;
    }
    if float >= LIMIT {
        return Some(Ordering::Less);
    }
    if float <= -LIMIT {
        return Some(Ordering::Greater);
    }

    let whole = float.trunc();
    // `whole` is integral and within i128 range, so the cast is exact
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)),
        other => Some(other),
    }
}

impl fmt::Display for NumericBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericBound::I8(v) => write!(f, "{}", v)?,
            NumericBound::I16(v) => write!(f, "{}", v)?,
            NumericBound::I32(v) => write!(f, "{}", v)?,
            NumericBound::I64(v) => write!(f, "{}", v)?,
            NumericBound::F32(v) => write!(f, "{}", v)?,
            NumericBound::F64(v) => write!(f, "{}", v)?,
            NumericBound::Wide(v) => write!(f, "{}", v)?,
        }
        write!(f, "::{}", self.type_name())
    }
}

/// Right-hand side of an equality test
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Numeric value coerced to a numeric attribute's type
    Numeric(NumericBound),
    /// Value compared as-is
    Literal(Value),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Numeric(bound) => write!(f, "{}", bound),
            Operand::Literal(Value::String(s)) => write!(f, "'{}'", s),
            Operand::Literal(other) => write!(f, "{}", other),
        }
    }
}

/// WHERE clause tree
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// No constraint
    True,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    /// Negation under three-valued logic: a comparison on a null attribute
    /// is unknown and so is its negation
    Not(Box<Predicate>),
    Equal {
        attribute: AttributeRef,
        operand: Operand,
    },
    NotEqual {
        attribute: AttributeRef,
        operand: Operand,
    },
    GreaterThan {
        attribute: AttributeRef,
        bound: NumericBound,
    },
    LessThan {
        attribute: AttributeRef,
        bound: NumericBound,
    },
    /// SQL LIKE on the attribute's string form: `%` any run, `_` one char, `\` escapes
    Like {
        attribute: AttributeRef,
        pattern: String,
    },
    In {
        attribute: AttributeRef,
        values: Vec<String>,
    },
}

impl Predicate {
    /// Folds predicates with AND. An empty list is [`Predicate::True`].
    pub fn conjunction(mut predicates: Vec<Predicate>) -> Predicate {
        match predicates.len() {
            0 => Predicate::True,
            1 => predicates.remove(0),
            _ => Predicate::And(predicates),
        }
    }

    /// Folds predicates with OR. An empty list is also [`Predicate::True`].
    pub fn disjunction(mut predicates: Vec<Predicate>) -> Predicate {
        match predicates.len() {
            0 => Predicate::True,
            1 => predicates.remove(0),
            _ => Predicate::Or(predicates),
        }
    }

    pub fn negate(predicate: Predicate) -> Predicate {
        Predicate::Not(Box::new(predicate))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, predicates: &[Predicate], joiner: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, predicate) in predicates.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", joiner)?;
        }
        write!(f, "{}", predicate)?;
    }
    write!(f, ")")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => write!(f, "TRUE"),
            Predicate::And(predicates) => write_group(f, predicates, "AND"),
            Predicate::Or(predicates) => write_group(f, predicates, "OR"),
            Predicate::Not(inner) => write!(f, "NOT {}", inner),
            Predicate::Equal { attribute, operand } => write!(f, "{} = {}", attribute, operand),
            Predicate::NotEqual { attribute, operand } => {
                write!(f, "{} != {}", attribute, operand)
            }
            Predicate::GreaterThan { attribute, bound } => write!(f, "{} > {}", attribute, bound),
            Predicate::LessThan { attribute, bound } => write!(f, "{} < {}", attribute, bound),
            Predicate::Like { attribute, pattern } => {
                write!(f, "{} LIKE '{}'", attribute, pattern)
            }
            Predicate::In { attribute, values } => {
                let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
                write!(f, "{} IN ({})", attribute, quoted.join(", "))
            }
        }
    }
}

/// Sort direction of an ordering clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// ORDER BY on one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub attribute: AttributeRef,
    pub direction: SortDirection,
}

/// Composed query ready for a storage engine
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableQuery {
    /// Root entity name
    pub root: String,
    /// Join clauses; a clause's parent always precedes it
    pub joins: Vec<JoinClause>,
    pub predicate: Predicate,
    pub order: Option<OrderClause>,
    /// Rows skipped before the first result (`None` = 0)
    pub offset: Option<u32>,
    /// Result cap (`None` = unbounded)
    pub limit: Option<u32>,
}

impl ExecutableQuery {
    /// Returns the join clause behind a handle
    pub fn join(&self, handle: JoinHandle) -> Option<&JoinClause> {
        self.joins.get(handle.index())
    }

    /// Same query without offset and limit
    pub fn unbounded(&self) -> ExecutableQuery {
        ExecutableQuery {
            offset: None,
            limit: None,
            ..self.clone()
        }
    }
}

/// String form of a scalar: strings unquoted, everything else as JSON
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attr(path: &str, attribute_type: AttributeType) -> AttributeRef {
        AttributeRef {
            source: Source::Root,
            name: path.to_string(),
            attribute_type,
            path: path.to_string(),
        }
    }

    fn number(value: Value) -> Number {
        match value {
            Value::Number(n) => n,
            other => panic!("not a number: {}", other),
        }
    }

    #[test]
    fn test_empty_folds_are_true() {
        assert!(Predicate::conjunction(Vec::new()).is_true());
        assert!(Predicate::disjunction(Vec::new()).is_true());
    }

    #[test]
    fn test_single_fold_unwraps() {
        let p = Predicate::Like {
            attribute: attr("name", AttributeType::String),
            pattern: "%a%".into(),
        };
        assert_eq!(Predicate::conjunction(vec![p.clone()]), p);
        assert_eq!(Predicate::disjunction(vec![p.clone()]), p);
    }

    #[test]
    fn test_integer_bound_compare() {
        let bound = NumericBound::I32(10);
        assert_eq!(bound.compare(&number(json!(10))), Some(Ordering::Equal));
        assert_eq!(bound.compare(&number(json!(11))), Some(Ordering::Greater));
        assert_eq!(bound.compare(&number(json!(-3))), Some(Ordering::Less));
        assert_eq!(bound.compare(&number(json!(u64::MAX))), Some(Ordering::Greater));
    }

    #[test]
    fn test_float_bound_compare() {
        let bound = NumericBound::F64(2.5);
        assert_eq!(bound.compare(&number(json!(2.5))), Some(Ordering::Equal));
        assert_eq!(bound.compare(&number(json!(3))), Some(Ordering::Greater));

        let bound = NumericBound::F32(0.5);
        assert_eq!(bound.compare(&number(json!(0.5))), Some(Ordering::Equal));
        assert_eq!(bound.compare(&number(json!(0.1))), Some(Ordering::Less));
    }

    #[test]
    fn test_wide_bound_compare_is_exact() {
        let above_u64 = NumericBound::Wide(number(json!(u64::MAX)));
        assert_eq!(above_u64.compare(&number(json!(10))), Some(Ordering::Less));
        assert_eq!(above_u64.compare(&number(json!(i64::MAX))), Some(Ordering::Less));
        assert_eq!(above_u64.compare(&number(json!(u64::MAX))), Some(Ordering::Equal));

        let fraction = NumericBound::Wide(number(json!(9.8)));
        assert_eq!(fraction.compare(&number(json!(9))), Some(Ordering::Less));
        assert_eq!(fraction.compare(&number(json!(10))), Some(Ordering::Greater));
        assert_eq!(fraction.compare(&number(json!(9.8))), Some(Ordering::Equal));

        let negative = NumericBound::Wide(number(json!(-0.5)));
        assert_eq!(negative.compare(&number(json!(0))), Some(Ordering::Greater));
        assert_eq!(negative.compare(&number(json!(-1))), Some(Ordering::Less));
        assert_eq!(negative.to_string(), "-0.5::number");
    }

    #[test]
    fn test_integer_bound_against_float_value() {
        let bound = NumericBound::I64(i64::MAX);
        assert_eq!(bound.compare(&number(json!(9.3e18))), Some(Ordering::Greater));
        assert_eq!(bound.compare(&number(json!(9.2e18))), Some(Ordering::Less));
        assert_eq!(NumericBound::I32(3).compare(&number(json!(3.0))), Some(Ordering::Equal));
    }

    #[test]
    fn test_predicate_display() {
        let p = Predicate::And(vec![
            Predicate::GreaterThan {
                attribute: attr("price", AttributeType::F64),
                bound: NumericBound::F64(10.0),
            },
            Predicate::negate(Predicate::In {
                attribute: attr("dept.name", AttributeType::String),
                values: vec!["a".into(), "b".into()],
            }),
        ]);
        assert_eq!(
            p.to_string(),
            "(price > 10::f64 AND NOT dept.name IN ('a', 'b'))"
        );
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("abc")), "abc");
        assert_eq!(value_text(&json!(12)), "12");
        assert_eq!(value_text(&json!(true)), "true");
    }
}
