//! Join resolution
//!
//! Declared join paths are attached one segment at a time. A prefix that
//! is already joined is reused, so `a` and `a.b` produce exactly two clauses
//! and a path declared twice is attached once.

use std::collections::{HashMap, HashSet};

use crate::criteria::CriteriaJoin;
use crate::schema::{EntityDef, EntityRegistry};

use super::errors::{TranslateError, TranslateResult};
use super::query::{AttributeRef, JoinClause, JoinHandle, Source};

/// Join clauses of one translation, indexed by fully-qualified path.
///
/// Built fresh per translation; never shared between calls.
#[derive(Debug, Default)]
pub struct JoinGraph {
    clauses: Vec<JoinClause>,
    by_path: HashMap<String, JoinHandle>,
    processed: HashSet<String>,
}

impl JoinGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches every declared join, in declaration order
    pub fn resolve(
        joins: &[CriteriaJoin],
        root: &EntityDef,
        registry: &EntityRegistry,
    ) -> TranslateResult<Self> {
        let mut graph = Self::new();
        for join in joins {
            graph.attach(join, root, registry)?;
        }
        Ok(graph)
    }

    /// Attaches one declared join and returns the source of its last segment.
    ///
    /// Missing prefixes are created with the declared join type; existing
    /// ones keep the type they were created with.
    pub fn attach(
        &mut self,
        join: &CriteriaJoin,
        root: &EntityDef,
        registry: &EntityRegistry,
    ) -> TranslateResult<Source> {
        if self.processed.contains(&join.path) {
            if let Some(handle) = self.by_path.get(&join.path) {
                return Ok(Source::Join(*handle));
            }
        }

        let mut current = Source::Root;
        let mut entity = root;
        let mut prefix = String::new();

        for segment in join.segments() {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);

            if let Some(handle) = self.by_path.get(&prefix).copied() {
                current = Source::Join(handle);
                entity = self.entity_of(handle, registry)?;
                continue;
            }

            let relation = entity
                .relation(segment)
                .ok_or_else(|| TranslateError::UnknownRelation {
                    entity: entity.name.clone(),
                    relation: segment.to_string(),
                })?;
            let target = registry
                .get(&relation.target)
                .ok_or_else(|| TranslateError::UnknownEntity(relation.target.clone()))?;

            let handle = JoinHandle(self.clauses.len());
            self.clauses.push(JoinClause {
                path: prefix.clone(),
                parent: current,
                relation: segment.to_string(),
                entity: target.name.clone(),
                join_type: join.join_type,
                cardinality: relation.cardinality,
            });
            self.by_path.insert(prefix.clone(), handle);

            current = Source::Join(handle);
            entity = target;
        }

        self.processed.insert(join.path.clone());
        Ok(current)
    }

    /// Resolves a field path against the root or an attached join.
    ///
    /// `name` is a root attribute. `a.b.name` reads `name` from the join at
    /// `a.b`, which must already be attached.
    pub fn resolve_attribute(
        &self,
        field: &str,
        root: &EntityDef,
        registry: &EntityRegistry,
    ) -> TranslateResult<AttributeRef> {
        let (source, entity, name) = match field.rsplit_once('.') {
            None => (Source::Root, root, field),
            Some((join_path, name)) => {
                let handle = self.lookup(join_path).ok_or_else(|| {
                    TranslateError::UnresolvedJoin {
                        path: join_path.to_string(),
                    }
                })?;
                (Source::Join(handle), self.entity_of(handle, registry)?, name)
            }
        };

        let attribute_type =
            entity
                .attribute(name)
                .ok_or_else(|| TranslateError::UnknownAttribute {
                    entity: entity.name.clone(),
                    attribute: name.to_string(),
                })?;

        Ok(AttributeRef {
            source,
            name: name.to_string(),
            attribute_type,
            path: field.to_string(),
        })
    }

    /// Returns the handle of an attached path
    pub fn lookup(&self, path: &str) -> Option<JoinHandle> {
        self.by_path.get(path).copied()
    }

    pub fn clause(&self, handle: JoinHandle) -> Option<&JoinClause> {
        self.clauses.get(handle.index())
    }

    pub fn clauses(&self) -> &[JoinClause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn into_clauses(self) -> Vec<JoinClause> {
        self.clauses
    }

    fn entity_of<'r>(
        &self,
        handle: JoinHandle,
        registry: &'r EntityRegistry,
    ) -> TranslateResult<&'r EntityDef> {
        let name = self
            .clause(handle)
            .map(|clause| clause.entity.as_str())
            .unwrap_or_default();
        registry
            .get(name)
            .ok_or_else(|| TranslateError::UnknownEntity(name.to_string()))
    }
}
