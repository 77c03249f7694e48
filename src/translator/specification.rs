//! Declarative translation
//!
//! A [`Specification`] is handed a [`QueryScope`] for the root entity and
//! returns a predicate, attaching joins and ordering to the scope as a side
//! effect. [`CriteriaSpecification`] is the criteria-driven implementation
//! and yields the same query as [`super::QueryTranslator`].

use crate::criteria::{Criteria, CriteriaJoin};
use crate::observability::{Event, Logger};
use crate::schema::{EntityDef, EntityRegistry};

use super::compose::FilterComposer;
use super::errors::{TranslateError, TranslateResult};
use super::factory::PredicateFactory;
use super::joins::JoinGraph;
use super::query::{AttributeRef, ExecutableQuery, OrderClause, Predicate, Source};

/// Query under construction for one root entity
pub struct QueryScope<'a> {
    registry: &'a EntityRegistry,
    root: &'a EntityDef,
    graph: JoinGraph,
    order: Option<OrderClause>,
    offset: Option<u32>,
    limit: Option<u32>,
}

impl<'a> QueryScope<'a> {
    pub fn new(registry: &'a EntityRegistry, root: &str) -> TranslateResult<Self> {
        let root = registry
            .get(root)
            .ok_or_else(|| TranslateError::UnknownEntity(root.to_string()))?;

        Ok(Self {
            registry,
            root,
            graph: JoinGraph::new(),
            order: None,
            offset: None,
            limit: None,
        })
    }

    pub fn root(&self) -> &'a EntityDef {
        self.root
    }

    /// Attaches a join path to the scope
    pub fn join(&mut self, join: &CriteriaJoin) -> TranslateResult<Source> {
        self.graph.attach(join, self.root, self.registry)
    }

    /// Resolves a field path against the root or an attached join
    pub fn get(&self, field: &str) -> TranslateResult<AttributeRef> {
        self.graph.resolve_attribute(field, self.root, self.registry)
    }

    pub fn order_by(&mut self, clause: OrderClause) {
        self.order = Some(clause);
    }

    pub fn window(&mut self, offset: Option<u32>, limit: Option<u32>) {
        self.offset = offset;
        self.limit = limit;
    }

    /// Composer reading from the joins attached so far
    pub fn composer<'s>(&'s self, factory: &'s PredicateFactory) -> FilterComposer<'s> {
        FilterComposer::new(factory, self.registry, self.root, &self.graph)
    }

    /// Finishes the scope with its WHERE predicate
    pub fn into_query(self, predicate: Predicate) -> ExecutableQuery {
        ExecutableQuery {
            root: self.root.name.clone(),
            joins: self.graph.into_clauses(),
            predicate,
            order: self.order,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// Declarative query definition
pub trait Specification {
    /// Produces the WHERE predicate, attaching joins and ordering to `scope`
    fn to_predicate(&self, scope: &mut QueryScope<'_>) -> TranslateResult<Predicate>;
}

/// Specification backed by a criteria value
pub struct CriteriaSpecification<'a> {
    criteria: &'a Criteria,
    factory: &'a PredicateFactory,
}

impl<'a> CriteriaSpecification<'a> {
    pub fn new(criteria: &'a Criteria, factory: &'a PredicateFactory) -> Self {
        Self { criteria, factory }
    }

    /// Specification using the process-wide predicate factory
    pub fn from_criteria(criteria: &'a Criteria) -> Self {
        Self::new(criteria, PredicateFactory::shared())
    }

    pub fn criteria(&self) -> &'a Criteria {
        self.criteria
    }
}

impl Specification for CriteriaSpecification<'_> {
    fn to_predicate(&self, scope: &mut QueryScope<'_>) -> TranslateResult<Predicate> {
        for join in self.criteria.joins() {
            scope.join(join)?;
        }

        let order = scope
            .composer(self.factory)
            .order_clause(self.criteria.order())?;
        if let Some(clause) = order {
            scope.order_by(clause);
        }

        scope.window(self.criteria.offset(), self.criteria.limit());

        scope.composer(self.factory).compose_all(self.criteria.filters())
    }
}

/// Runs a specification against a fresh scope rooted at `root`
pub fn build_query(
    spec: &dyn Specification,
    registry: &EntityRegistry,
    root: &str,
) -> TranslateResult<ExecutableQuery> {
    let result = QueryScope::new(registry, root).and_then(|mut scope| {
        let predicate = spec.to_predicate(&mut scope)?;
        Ok(scope.into_query(predicate))
    });

    match &result {
        Ok(query) => {
            let joins = query.joins.len().to_string();
            Logger::trace(
                Event::CriteriaTranslated,
                &[
                    ("root", root),
                    ("joins", joins.as_str()),
                    ("target", "specification"),
                ],
            );
        }
        Err(err) => {
            let reason = err.to_string();
            Logger::warn(
                Event::TranslationRejected,
                &[("root", root), ("code", err.code()), ("reason", reason.as_str())],
            );
        }
    }

    result
}
