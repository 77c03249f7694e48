//! Predicate factory
//!
//! Maps each single-filter operator to a predicate builder and each numeric
//! attribute type to a coercion for comparison values. Both tables are
//! immutable after construction; [`PredicateFactory::shared`] hands out one
//! process-wide instance.
//!
//! A coercion never changes the value: a number the attribute type cannot
//! hold exactly is kept as [`NumericBound::Wide`].

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::{Number, Value};

use crate::criteria::{SingleFilter, SingleFilterOperator};
use crate::schema::AttributeType;

use super::errors::{TranslateError, TranslateResult};
use super::query::{value_text, AttributeRef, NumericBound, Operand, Predicate};

type PredicateBuilder = fn(&PredicateFactory, AttributeRef, &Value) -> TranslateResult<Predicate>;
type Coercion = fn(&Number) -> Option<NumericBound>;

static SHARED: LazyLock<PredicateFactory> = LazyLock::new(PredicateFactory::new);

/// Builds typed predicates from single filters
pub struct PredicateFactory {
    builders: HashMap<SingleFilterOperator, PredicateBuilder>,
    coercions: HashMap<AttributeType, Coercion>,
}

impl Default for PredicateFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PredicateFactory {
    pub fn new() -> Self {
        let mut builders: HashMap<SingleFilterOperator, PredicateBuilder> = HashMap::new();
        builders.insert(SingleFilterOperator::Equal, Self::equal);
        builders.insert(SingleFilterOperator::NotEqual, Self::not_equal);
        builders.insert(SingleFilterOperator::Gt, Self::greater_than);
        builders.insert(SingleFilterOperator::Lt, Self::less_than);
        builders.insert(SingleFilterOperator::Contains, Self::contains);
        builders.insert(SingleFilterOperator::NotContains, Self::not_contains);
        builders.insert(SingleFilterOperator::In, Self::in_list);
        // NOT_IN has no builder

        let mut coercions: HashMap<AttributeType, Coercion> = HashMap::new();
        coercions.insert(AttributeType::I8, |n| {
            integral(n).and_then(|i| i8::try_from(i).ok()).map(NumericBound::I8)
        });
        coercions.insert(AttributeType::I16, |n| {
            integral(n).and_then(|i| i16::try_from(i).ok()).map(NumericBound::I16)
        });
        coercions.insert(AttributeType::I32, |n| {
            integral(n).and_then(|i| i32::try_from(i).ok()).map(NumericBound::I32)
        });
        coercions.insert(AttributeType::I64, |n| integral(n).map(NumericBound::I64));
        coercions.insert(AttributeType::F32, |n| single(n).map(NumericBound::F32));
        coercions.insert(AttributeType::F64, |n| double(n).map(NumericBound::F64));

        Self {
            builders,
            coercions,
        }
    }

    /// Process-wide factory instance
    pub fn shared() -> &'static PredicateFactory {
        &SHARED
    }

    /// Returns true if the operator has a builder
    pub fn supports(&self, operator: SingleFilterOperator) -> bool {
        self.builders.contains_key(&operator)
    }

    /// Builds the predicate for a single filter against a resolved attribute
    pub fn build(&self, filter: &SingleFilter, attribute: AttributeRef) -> TranslateResult<Predicate> {
        let operator = filter
            .operator
            .ok_or_else(|| TranslateError::UnsupportedOperator {
                operator: "<unrecognized>".to_string(),
            })?;
        let builder =
            self.builders
                .get(&operator)
                .ok_or_else(|| TranslateError::UnsupportedOperator {
                    operator: operator.token().to_string(),
                })?;
        builder(self, attribute, &filter.value)
    }

    /// Coerces a comparison value to the attribute's numeric type
    pub fn coerce(
        &self,
        operator: SingleFilterOperator,
        attribute: &AttributeRef,
        value: &Value,
    ) -> TranslateResult<NumericBound> {
        let number = match value {
            Value::Number(n) => n,
            other => {
                return Err(TranslateError::InvalidFilterValue {
                    operator: operator.token().to_string(),
                    value: other.to_string(),
                })
            }
        };

        let coercion = self
            .coercions
            .get(&attribute.attribute_type)
            .ok_or_else(|| TranslateError::UnsupportedAttributeType {
                attribute: attribute.path.clone(),
                type_name: attribute.attribute_type.type_name().to_string(),
            })?;

        Ok(typed_or_wide(*coercion, number))
    }

    fn operand(&self, attribute: &AttributeRef, value: &Value) -> Operand {
        match (value, self.coercions.get(&attribute.attribute_type)) {
            (Value::Number(n), Some(coercion)) => Operand::Numeric(typed_or_wide(*coercion, n)),
            _ => Operand::Literal(value.clone()),
        }
    }

    fn equal(&self, attribute: AttributeRef, value: &Value) -> TranslateResult<Predicate> {
        let operand = self.operand(&attribute, value);
        Ok(Predicate::Equal { attribute, operand })
    }

    fn not_equal(&self, attribute: AttributeRef, value: &Value) -> TranslateResult<Predicate> {
        let operand = self.operand(&attribute, value);
        Ok(Predicate::NotEqual { attribute, operand })
    }

    fn greater_than(&self, attribute: AttributeRef, value: &Value) -> TranslateResult<Predicate> {
        let bound = self.coerce(SingleFilterOperator::Gt, &attribute, value)?;
        Ok(Predicate::GreaterThan { attribute, bound })
    }

    fn less_than(&self, attribute: AttributeRef, value: &Value) -> TranslateResult<Predicate> {
        let bound = self.coerce(SingleFilterOperator::Lt, &attribute, value)?;
        Ok(Predicate::LessThan { attribute, bound })
    }

    fn contains(&self, attribute: AttributeRef, value: &Value) -> TranslateResult<Predicate> {
        Ok(Predicate::Like {
            attribute,
            pattern: contains_pattern(value),
        })
    }

    fn not_contains(&self, attribute: AttributeRef, value: &Value) -> TranslateResult<Predicate> {
        self.contains(attribute, value).map(Predicate::negate)
    }

    fn in_list(&self, attribute: AttributeRef, value: &Value) -> TranslateResult<Predicate> {
        let list = value
            .as_str()
            .ok_or_else(|| TranslateError::InvalidFilterValue {
                operator: SingleFilterOperator::In.token().to_string(),
                value: value.to_string(),
            })?;

        let values = list.split(',').map(|v| v.trim().to_string()).collect();
        Ok(Predicate::In { attribute, values })
    }
}

fn typed_or_wide(coercion: Coercion, n: &Number) -> NumericBound {
    coercion(n).unwrap_or_else(|| NumericBound::Wide(n.clone()))
}

/// Largest magnitude below which every integer is an exact f64
const F64_EXACT_INT: u64 = 1 << 53;

/// The number as an i64, when it is a whole number in range
fn integral(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        return None;
    }
    let f = n.as_f64()?;
    // i64::MIN is -2^63 exactly; 2^63 itself is out of range
    let in_range = (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&f);
    (f.fract() == 0.0 && in_range).then(|| f as i64)
}

/// The number as an f64, when no rounding is needed
fn double(n: &Number) -> Option<f64> {
    if n.is_f64() {
        return n.as_f64();
    }
    if let Some(i) = n.as_i64() {
        return (i.unsigned_abs() <= F64_EXACT_INT).then(|| i as f64);
    }
    n.as_u64()
        .filter(|u| *u <= F64_EXACT_INT)
        .map(|u| u as f64)
}

/// The number as an f32, when no rounding is needed
fn single(n: &Number) -> Option<f32> {
    let f = double(n)?;
    let narrowed = f as f32;
    (f64::from(narrowed) == f).then_some(narrowed)
}

/// `%value%` with LIKE metacharacters in the value escaped
fn contains_pattern(value: &Value) -> String {
    let text = value_text(value);
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
