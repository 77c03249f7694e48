//! Entity schemas
//!
//! Entities declare typed attributes and navigable relations. The translator
//! reads attribute types to pick numeric coercions and walks relations to
//! resolve joins.

mod errors;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use registry::EntityRegistry;
pub use types::{AttributeType, Cardinality, EntityDef, RelationDef};
