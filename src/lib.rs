//! criteria-engine - translate filter criteria into executable queries
//!
//! A [`criteria::Criteria`] (filters, ordering, joins, window) is checked
//! against an [`schema::EntityRegistry`] and compiled by the
//! [`translator`] into an [`translator::ExecutableQuery`]. The [`executor`]
//! runs queries; [`catalog`] is a product search use case on top.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod criteria;
pub mod executor;
pub mod observability;
pub mod schema;
pub mod translator;
