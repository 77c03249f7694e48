//! Criteria translation
//!
//! Turns a [`crate::criteria::Criteria`] into an [`ExecutableQuery`] for a
//! root entity. Two equivalent targets are provided:
//! - [`QueryTranslator::translate`], builder style
//! - [`CriteriaSpecification`], a declarative [`Specification`]
//!
//! Translation is pure: the same criteria and registry always yield the
//! same query, and no state survives between calls.

mod compose;
mod errors;
mod explain;
mod factory;
mod joins;
mod query;
mod specification;
mod translator;

pub use compose::FilterComposer;
pub use errors::{TranslateError, TranslateResult};
pub use explain::ExplainPlan;
pub use factory::PredicateFactory;
pub use joins::JoinGraph;
pub use query::{
    AttributeRef, ExecutableQuery, JoinClause, JoinHandle, NumericBound, Operand, OrderClause,
    Predicate, SortDirection, Source,
};
pub(crate) use query::value_text;
pub use specification::{build_query, CriteriaSpecification, QueryScope, Specification};
pub use translator::QueryTranslator;

/// Employee / department / project schema shared by unit tests
#[cfg(test)]
pub(crate) fn sample_registry() -> crate::schema::EntityRegistry {
    use crate::schema::{AttributeType, EntityDef, EntityRegistry, RelationDef};

    EntityRegistry::from_entities([
        EntityDef::new("employee")
            .with_attribute("id", AttributeType::Uuid)
            .with_attribute("name", AttributeType::String)
            .with_attribute("age", AttributeType::I32)
            .with_attribute("salary", AttributeType::F64)
            .with_attribute("level", AttributeType::I8)
            .with_attribute("grade", AttributeType::I16)
            .with_attribute("rating", AttributeType::F32)
            .with_attribute("badge", AttributeType::I64)
            .with_attribute("active", AttributeType::Bool)
            .with_relation("dept", RelationDef::one("department"))
            .with_relation("projects", RelationDef::many("project")),
        EntityDef::new("department")
            .with_attribute("name", AttributeType::String)
            .with_attribute("budget", AttributeType::I64)
            .with_relation("manager", RelationDef::one("employee")),
        EntityDef::new("project").with_attribute("title", AttributeType::String),
    ])
    .expect("sample registry is valid")
}
