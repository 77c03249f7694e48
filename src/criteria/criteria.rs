//! The criteria value object

use serde::{Deserialize, Serialize};

use super::filter::Filter;
use super::join::CriteriaJoin;
use super::order::Order;
use super::pagination::Pagination;

/// Filters, ordering, joins and an optional result window.
///
/// Filters are append-only once constructed and the order is fixed at
/// construction time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(default)]
    filters: Vec<Filter>,
    #[serde(default)]
    order: Order,
    #[serde(default)]
    joins: Vec<CriteriaJoin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
}

impl Criteria {
    pub fn new(filters: Vec<Filter>, order: Order) -> Self {
        Self {
            filters,
            order,
            ..Default::default()
        }
    }

    pub fn with_joins(mut self, joins: Vec<CriteriaJoin>) -> Self {
        self.joins = joins;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets limit and offset from a resolved page window
    pub fn paginate(self, pagination: Pagination) -> Self {
        self.with_limit(pagination.limit)
            .with_offset(pagination.offset())
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn joins(&self) -> &[CriteriaJoin] {
        &self.joins
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{OrderType, SingleFilterOperator};
    use serde_json::json;

    #[test]
    fn test_builder() {
        let mut criteria = Criteria::new(Vec::new(), Order::desc("price"))
            .with_joins(vec![CriteriaJoin::inner("category")])
            .with_limit(10)
            .with_offset(20);
        assert!(!criteria.has_filters());

        criteria.add_filter(Filter::single("price", SingleFilterOperator::Gt, json!(1)));
        assert!(criteria.has_filters());
        assert_eq!(criteria.joins().len(), 1);
        assert_eq!(criteria.limit(), Some(10));
        assert_eq!(criteria.offset(), Some(20));
        assert_eq!(criteria.order().direction, OrderType::Desc);
    }

    #[test]
    fn test_paginate() {
        let criteria = Criteria::default().paginate(Pagination { limit: 25, page: 2 });
        assert_eq!(criteria.limit(), Some(25));
        assert_eq!(criteria.offset(), Some(50));
    }

    #[test]
    fn test_deserialize_minimal() {
        let criteria: Criteria = serde_json::from_value(json!({})).unwrap();
        assert!(!criteria.has_filters());
        assert!(!criteria.order().has_order());
        assert!(criteria.joins().is_empty());
        assert_eq!(criteria.limit(), None);
    }
}
