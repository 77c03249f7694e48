//! Criteria model
//!
//! Backend-agnostic description of a query: a filter tree, an optional
//! ordering clause, join declarations and an optional result window.
//! Nothing here references a storage engine.

mod criteria;
mod filter;
mod join;
mod order;
mod pagination;

pub use criteria::Criteria;
pub use filter::{CompoundFilter, CompoundFilterOperator, Filter, SingleFilter, SingleFilterOperator};
pub use join::{CriteriaJoin, JoinType};
pub use order::{Order, OrderType};
pub use pagination::{Page, Pagination, PaginationQuery};
