//! Explain output
//!
//! Deterministic, human-readable description of a translated query or of
//! the reason a translation was rejected.

use std::fmt;

use serde::Serialize;

use super::errors::TranslateError;
use super::query::{ExecutableQuery, Source};

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainPlan {
    /// Whether translation succeeded
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// One line per join clause, in creation order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Rejection reason (if rejected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a translated query
    pub fn from_query(query: &ExecutableQuery) -> Self {
        let joins = query
            .joins
            .iter()
            .map(|clause| {
                let parent = match clause.parent {
                    Source::Root => query.root.as_str(),
                    Source::Join(handle) => query
                        .join(handle)
                        .map(|parent| parent.path.as_str())
                        .unwrap_or("?"),
                };
                format!(
                    "{} JOIN {} ({} -> {}, {:?})",
                    clause.join_type.as_str().to_uppercase(),
                    clause.path,
                    parent,
                    clause.entity,
                    clause.cardinality
                )
            })
            .collect();

        let order = query
            .order
            .as_ref()
            .map(|o| format!("{} {}", o.attribute.path, o.direction.as_str()));

        Self {
            accepted: true,
            root: Some(query.root.clone()),
            joins,
            predicate: Some(query.predicate.to_string()),
            order,
            offset: query.offset,
            limit: query.limit,
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a translation error
    pub fn from_error(err: &TranslateError) -> Self {
        Self {
            accepted: false,
            root: None,
            joins: Vec::new(),
            predicate: None,
            order: None,
            offset: None,
            limit: None,
            rejection_reason: Some(err.to_string()),
            rejection_code: Some(err.code().to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if let Some(root) = &self.root {
                writeln!(f, "Root: {}", root)?;
            }
            if !self.joins.is_empty() {
                writeln!(f, "Joins:")?;
                for join in &self.joins {
                    writeln!(f, "  - {}", join)?;
                }
            }
            if let Some(predicate) = &self.predicate {
                writeln!(f, "Where: {}", predicate)?;
            }
            if let Some(order) = &self.order {
                writeln!(f, "Order: {}", order)?;
            }
            if let Some(offset) = self.offset {
                writeln!(f, "Offset: {}", offset)?;
            }
            if let Some(limit) = self.limit {
                writeln!(f, "Limit: {}", limit)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{Criteria, CriteriaJoin, Filter, Order, SingleFilterOperator};
    use crate::translator::{sample_registry, QueryTranslator};
    use serde_json::json;

    fn translate(criteria: &Criteria) -> ExecutableQuery {
        let registry = sample_registry();
        QueryTranslator::with_shared_factory(&registry)
            .translate(criteria, "employee")
            .unwrap()
    }

    #[test]
    fn test_explain_accepted() {
        let criteria = Criteria::new(
            vec![Filter::single("dept.manager.age", SingleFilterOperator::Gt, json!(40))],
            Order::asc("name"),
        )
        .with_joins(vec![CriteriaJoin::left("dept.manager")])
        .with_limit(10);

        let explain = ExplainPlan::from_query(&translate(&criteria));
        assert!(explain.accepted);
        assert_eq!(explain.joins.len(), 2);
        assert_eq!(explain.joins[0], "LEFT JOIN dept (employee -> department, One)");
        assert_eq!(explain.joins[1], "LEFT JOIN dept.manager (dept -> employee, One)");
        assert_eq!(explain.predicate.as_deref(), Some("dept.manager.age > 40::i32"));
        assert_eq!(explain.order.as_deref(), Some("name asc"));

        let output = explain.to_string();
        assert!(output.contains("Status: ACCEPTED"));
        assert!(output.contains("Limit: 10"));
    }

    #[test]
    fn test_explain_rejected() {
        let err = TranslateError::UnsupportedOperator {
            operator: "NOT_IN".into(),
        };
        let explain = ExplainPlan::from_error(&err);

        assert!(!explain.accepted);
        assert_eq!(explain.rejection_code.as_deref(), Some("CRITERIA_UNSUPPORTED_OPERATOR"));

        let output = explain.to_string();
        assert!(output.contains("REJECTED"));
        assert!(output.contains("NOT_IN"));
    }

    #[test]
    fn test_explain_deterministic() {
        let criteria = Criteria::new(
            vec![Filter::single("name", SingleFilterOperator::In, json!("a,b"))],
            Order::none(),
        );
        let first = ExplainPlan::from_query(&translate(&criteria)).to_string();
        let second = ExplainPlan::from_query(&translate(&criteria)).to_string();
        assert_eq!(first, second);
    }
}
