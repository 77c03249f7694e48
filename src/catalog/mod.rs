//! Product catalog
//!
//! The use-case layer that builds criteria from product search parameters
//! and runs them through the execution port.

mod catalog;
mod errors;
mod product;
mod search;

pub use catalog::ProductCatalog;
pub use errors::{CatalogError, CatalogResult};
pub use product::{product_entity, NewProduct, Product, PRODUCT_ENTITY};
pub use search::ProductSearch;
