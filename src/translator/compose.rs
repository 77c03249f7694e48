//! Filter composition
//!
//! Walks a filter tree depth-first. Single filters resolve their field and
//! go through the predicate factory; compound filters fold their children
//! with AND or OR; unrecognized nodes contribute nothing.

use crate::criteria::{CompoundFilterOperator, Filter, Order, OrderType};
use crate::observability::{Event, Logger};
use crate::schema::{EntityDef, EntityRegistry};

use super::errors::TranslateResult;
use super::factory::PredicateFactory;
use super::joins::JoinGraph;
use super::query::{OrderClause, Predicate, SortDirection};

/// Turns filters and ordering into predicates over an attached join graph
pub struct FilterComposer<'a> {
    factory: &'a PredicateFactory,
    registry: &'a EntityRegistry,
    root: &'a EntityDef,
    graph: &'a JoinGraph,
}

impl<'a> FilterComposer<'a> {
    pub fn new(
        factory: &'a PredicateFactory,
        registry: &'a EntityRegistry,
        root: &'a EntityDef,
        graph: &'a JoinGraph,
    ) -> Self {
        Self {
            factory,
            registry,
            root,
            graph,
        }
    }

    /// Conjunction of all top-level filters; no filters means no constraint
    pub fn compose_all(&self, filters: &[Filter]) -> TranslateResult<Predicate> {
        let predicates = self.compose_each(filters)?;
        Ok(Predicate::conjunction(predicates))
    }

    /// Predicate for one filter node, `None` for unrecognized nodes
    pub fn compose(&self, filter: &Filter) -> TranslateResult<Option<Predicate>> {
        match filter {
            Filter::Single(single) => {
                let attribute =
                    self.graph
                        .resolve_attribute(&single.field, self.root, self.registry)?;
                self.factory.build(single, attribute).map(Some)
            }
            Filter::Compound(compound) => {
                let children = self.compose_each(&compound.filters)?;
                let predicate = match compound.operator {
                    CompoundFilterOperator::And => Predicate::conjunction(children),
                    CompoundFilterOperator::Or => Predicate::disjunction(children),
                };
                Ok(Some(predicate))
            }
            Filter::Unrecognized => {
                Logger::warn(
                    Event::FilterSkipped,
                    &[("kind", filter.kind()), ("root", self.root.name.as_str())],
                );
                Ok(None)
            }
        }
    }

    /// Ordering clause, `None` when the order is unset
    pub fn order_clause(&self, order: &Order) -> TranslateResult<Option<OrderClause>> {
        let direction = match order.direction {
            OrderType::None => return Ok(None),
            OrderType::Asc => SortDirection::Asc,
            OrderType::Desc => SortDirection::Desc,
        };

        let attribute = self
            .graph
            .resolve_attribute(&order.field, self.root, self.registry)?;
        Ok(Some(OrderClause {
            attribute,
            direction,
        }))
    }

    fn compose_each(&self, filters: &[Filter]) -> TranslateResult<Vec<Predicate>> {
        let mut predicates = Vec::with_capacity(filters.len());
        for filter in filters {
            if let Some(predicate) = self.compose(filter)? {
                predicates.push(predicate);
            }
        }
        Ok(predicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{CriteriaJoin, SingleFilterOperator};
    use crate::translator::sample_registry;
    use serde_json::json;

    #[test]
    fn test_empty_compounds_are_true() {
        let registry = sample_registry();
        let root = registry.get("employee").unwrap();
        let graph = JoinGraph::new();
        let composer = FilterComposer::new(PredicateFactory::shared(), &registry, root, &graph);

        assert!(composer.compose_all(&[]).unwrap().is_true());
        assert!(composer.compose_all(&[Filter::and(vec![])]).unwrap().is_true());
        assert!(composer.compose_all(&[Filter::or(vec![])]).unwrap().is_true());
    }

    #[test]
    fn test_unrecognized_contributes_nothing() {
        let registry = sample_registry();
        let root = registry.get("employee").unwrap();
        let graph = JoinGraph::new();
        let composer = FilterComposer::new(PredicateFactory::shared(), &registry, root, &graph);

        assert_eq!(composer.compose(&Filter::Unrecognized).unwrap(), None);

        let predicate = composer
            .compose_all(&[
                Filter::Unrecognized,
                Filter::single("age", SingleFilterOperator::Gt, json!(30)),
            ])
            .unwrap();
        assert!(matches!(predicate, Predicate::GreaterThan { .. }));
    }

    #[test]
    fn test_nested_compound() {
        let registry = sample_registry();
        let root = registry.get("employee").unwrap();
        let graph = JoinGraph::resolve(&[CriteriaJoin::inner("dept")], root, &registry).unwrap();
        let composer = FilterComposer::new(PredicateFactory::shared(), &registry, root, &graph);

        let predicate = composer
            .compose_all(&[Filter::or(vec![
                Filter::single("age", SingleFilterOperator::Lt, json!(25)),
                Filter::and(vec![
                    Filter::single("dept.name", SingleFilterOperator::Equal, json!("ops")),
                    Filter::single("name", SingleFilterOperator::Contains, json!("an")),
                ]),
            ])])
            .unwrap();

        assert_eq!(
            predicate.to_string(),
            "(age < 25::i32 OR (dept.name = 'ops' AND name LIKE '%an%'))"
        );
    }

    #[test]
    fn test_order_clause() {
        let registry = sample_registry();
        let root = registry.get("employee").unwrap();
        let graph = JoinGraph::new();
        let composer = FilterComposer::new(PredicateFactory::shared(), &registry, root, &graph);

        assert_eq!(composer.order_clause(&Order::none()).unwrap(), None);

        let clause = composer.order_clause(&Order::desc("salary")).unwrap().unwrap();
        assert_eq!(clause.direction, SortDirection::Desc);
        assert_eq!(clause.attribute.name, "salary");
    }
}
