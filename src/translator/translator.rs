//! Builder-style translation
//!
//! Order of work per call:
//! 1. Attach declared joins (prefix reuse, duplicates ignored)
//! 2. Compose top-level filters into one conjunction
//! 3. Resolve the ordering clause
//! 4. Carry the result window over unchanged
//!
//! Any failure aborts the whole translation; no partial query escapes.

use crate::criteria::Criteria;
use crate::observability::{Event, Logger};
use crate::schema::EntityRegistry;

use super::compose::FilterComposer;
use super::errors::{TranslateError, TranslateResult};
use super::factory::PredicateFactory;
use super::joins::JoinGraph;
use super::query::ExecutableQuery;

/// Translates criteria into executable queries against a registry.
///
/// Holds only shared references; one translator serves any number of
/// concurrent calls.
pub struct QueryTranslator<'a> {
    registry: &'a EntityRegistry,
    factory: &'a PredicateFactory,
}

impl<'a> QueryTranslator<'a> {
    pub fn new(registry: &'a EntityRegistry, factory: &'a PredicateFactory) -> Self {
        Self { registry, factory }
    }

    /// Translator using the process-wide predicate factory
    pub fn with_shared_factory(registry: &'a EntityRegistry) -> Self {
        Self::new(registry, PredicateFactory::shared())
    }

    pub fn registry(&self) -> &'a EntityRegistry {
        self.registry
    }

    pub fn factory(&self) -> &'a PredicateFactory {
        self.factory
    }

    /// Builds the query for `criteria` rooted at entity `root`
    pub fn translate(&self, criteria: &Criteria, root: &str) -> TranslateResult<ExecutableQuery> {
        let result = self.translate_inner(criteria, root);

        match &result {
            Ok(query) => {
                let joins = query.joins.len().to_string();
                let filters = criteria.filters().len().to_string();
                Logger::trace(
                    Event::CriteriaTranslated,
                    &[
                        ("root", root),
                        ("joins", joins.as_str()),
                        ("filters", filters.as_str()),
                        ("target", "builder"),
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

    fn translate_inner(&self, criteria: &Criteria, root: &str) -> TranslateResult<ExecutableQuery> {
        let root_def = self
            .registry
            .get(root)
            .ok_or_else(|| TranslateError::UnknownEntity(root.to_string()))?;

        let graph = JoinGraph::resolve(criteria.joins(), root_def, self.registry)?;

        let composer = FilterComposer::new(self.factory, self.registry, root_def, &graph);
        let predicate = composer.compose_all(criteria.filters())?;
        let order = composer.order_clause(criteria.order())?;

        Ok(ExecutableQuery {
            root: root_def.name.clone(),
            joins: graph.into_clauses(),
            predicate,
            order,
            offset: criteria.offset(),
            limit: criteria.limit(),
        })
    }
}
