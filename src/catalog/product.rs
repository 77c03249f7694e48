//! Product entity

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::schema::{AttributeType, EntityDef};

use super::errors::{CatalogError, CatalogResult};

/// Entity name products are stored under
pub const PRODUCT_ENTITY: &str = "product";

/// A catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Maps a stored row to a product
    pub fn from_row(row: &Value) -> CatalogResult<Self> {
        Product::deserialize(row).map_err(|e| CatalogError::InvalidProduct(e.to_string()))
    }

    /// Row form used by the store
    pub fn to_row(&self) -> Value {
        serde_json::json!({
            "id": self.id.to_string(),
            "name": self.name,
            "price": self.price,
            "quantity": self.quantity,
        })
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Fields of a product to create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Name not blank and 3 to 50 characters, price above zero, quantity
    /// zero or more
    pub fn validate(&self) -> CatalogResult<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::InvalidNewProduct(
                "product name can't be blank".into(),
            ));
        }

        let len = self.name.chars().count();
        if !(3..=50).contains(&len) {
            return Err(CatalogError::InvalidNewProduct(
                "product name length must be within [3, 50]".into(),
            ));
        }

        if self.price.is_nan() || self.price <= 0.0 {
            return Err(CatalogError::InvalidNewProduct(
                "product price must be greater than zero".into(),
            ));
        }

        if self.quantity < 0 {
            return Err(CatalogError::InvalidNewProduct(
                "product quantity must be zero or greater".into(),
            ));
        }

        Ok(())
    }

    /// Validated product with a fresh id
    pub fn into_product(self) -> CatalogResult<Product> {
        self.validate()?;
        Ok(Product::new(self.name, self.price, self.quantity))
    }
}

/// Schema of the product entity
pub fn product_entity() -> EntityDef {
    EntityDef::new(PRODUCT_ENTITY)
        .with_attribute("id", AttributeType::Uuid)
        .with_attribute("name", AttributeType::String)
        .with_attribute("price", AttributeType::F64)
        .with_attribute("quantity", AttributeType::I64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_round_trip() {
        let product = Product::new("lamp", 12.5, 3);
        assert_eq!(Product::from_row(&product.to_row()).unwrap(), product);
        assert!(product.in_stock());
    }

    #[test]
    fn test_invalid_row() {
        let err = Product::from_row(&json!({"id": "not-a-uuid", "name": "x", "price": 1.0, "quantity": 1}))
            .unwrap_err();
        assert_eq!(err.code(), "CATALOG_INVALID_PRODUCT");
    }

    #[test]
    fn test_new_product_validation() {
        let product = NewProduct::new("lamp", 12.5, 0).into_product().unwrap();
        assert_eq!(product.name, "lamp");
        assert!(!product.in_stock());

        for invalid in [
            NewProduct::new("   ", 1.0, 1),
            NewProduct::new("ab", 1.0, 1),
            NewProduct::new("x".repeat(51), 1.0, 1),
            NewProduct::new("lamp", 0.0, 1),
            NewProduct::new("lamp", f64::NAN, 1),
            NewProduct::new("lamp", 1.0, -1),
        ] {
            let err = invalid.validate().unwrap_err();
            assert_eq!(err.code(), "CATALOG_INVALID_NEW_PRODUCT");
        }
    }

    #[test]
    fn test_entity_schema() {
        let entity = product_entity();
        assert_eq!(entity.attribute("price"), Some(AttributeType::F64));
        assert_eq!(entity.attribute("quantity"), Some(AttributeType::I64));
        assert!(entity.validate_structure().is_ok());
    }
}
