//! Product search parameters

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::criteria::{Criteria, Filter, Order, SingleFilterOperator};

use super::errors::{CatalogError, CatalogResult};

/// Optional product filters; every present field narrows the result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSearch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub has_stock: Option<bool>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl ProductSearch {
    pub fn validate(&self) -> CatalogResult<()> {
        if let Some(name) = &self.name {
            let len = name.chars().count();
            if !(1..=50).contains(&len) {
                return Err(CatalogError::InvalidSearch(
                    "name filter length must be within [1, 50]".into(),
                ));
            }
        }

        for (label, price) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(price) = price {
                if price.is_nan() || price <= 0.0 {
                    return Err(CatalogError::InvalidSearch(format!(
                        "{} must be greater than zero",
                        label
                    )));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(CatalogError::InvalidSearch(
                    "min_price cannot be higher than max_price".into(),
                ));
            }
        }

        if matches!(self.quantity, Some(q) if q < 0) {
            return Err(CatalogError::InvalidSearch(
                "quantity must be zero or greater".into(),
            ));
        }

        Ok(())
    }

    /// Builds the criteria for this search, unordered and unwindowed
    pub fn to_criteria(&self) -> Criteria {
        let mut filters = Vec::new();

        if let Some(name) = &self.name {
            filters.push(Filter::single("name", SingleFilterOperator::Equal, json!(name)));
        }

        match self.has_stock {
            Some(true) => filters.push(Filter::single("quantity", SingleFilterOperator::Gt, json!(0))),
            Some(false) => {
                filters.push(Filter::single("quantity", SingleFilterOperator::Equal, json!(0)))
            }
            None => {}
        }

        if let Some(min) = self.min_price {
            filters.push(Filter::single("price", SingleFilterOperator::Gt, json!(min)));
        }

        if let Some(max) = self.max_price {
            filters.push(Filter::single("price", SingleFilterOperator::Lt, json!(max)));
        }

        if let Some(quantity) = self.quantity {
            filters.push(Filter::single(
                "quantity",
                SingleFilterOperator::Equal,
                json!(quantity),
            ));
        }

        Criteria::new(filters, Order::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_search() {
        let search = ProductSearch::default();
        assert!(search.validate().is_ok());
        assert!(!search.to_criteria().has_filters());
    }

    #[test]
    fn test_filters_in_order() {
        let search = ProductSearch {
            name: Some("lamp".into()),
            min_price: Some(1.5),
            max_price: Some(9.0),
            has_stock: Some(true),
            quantity: Some(4),
        };

        let rendered: Vec<String> = search
            .to_criteria()
            .filters()
            .iter()
            .map(|f| match f {
                Filter::Single(single) => single.to_string(),
                other => panic!("unexpected filter {:?}", other),
            })
            .collect();

        assert_eq!(
            rendered,
            vec!["name.=.lamp", "quantity.>.0", "price.>.1.5", "price.<.9.0", "quantity.=.4"]
        );
    }

    #[test]
    fn test_out_of_stock() {
        let search = ProductSearch {
            has_stock: Some(false),
            ..Default::default()
        };
        match &search.to_criteria().filters()[0] {
            Filter::Single(single) => assert_eq!(single.to_string(), "quantity.=.0"),
            other => panic!("unexpected filter {:?}", other),
        }
    }

    #[test]
    fn test_validation() {
        let invalid = [
            ProductSearch {
                name: Some(String::new()),
                ..Default::default()
            },
            ProductSearch {
                name: Some("x".repeat(51)),
                ..Default::default()
            },
            ProductSearch {
                min_price: Some(0.0),
                ..Default::default()
            },
            ProductSearch {
                min_price: Some(5.0),
                max_price: Some(2.0),
                ..Default::default()
            },
            ProductSearch {
                quantity: Some(-1),
                ..Default::default()
            },
        ];
        for search in invalid {
            assert_eq!(search.validate().unwrap_err().code(), "CATALOG_INVALID_SEARCH");
        }

        let valid = ProductSearch {
            min_price: Some(2.0),
            max_price: Some(2.0),
            quantity: Some(0),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());
    }
}
