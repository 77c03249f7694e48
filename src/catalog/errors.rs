//! Catalog errors

use thiserror::Error;

use crate::executor::ExecutorError;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by the product catalog
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Search parameters failed validation
    #[error("Invalid search: {0}")]
    InvalidSearch(String),

    /// Fields of a product to create failed validation
    #[error("Invalid new product: {0}")]
    InvalidNewProduct(String),

    /// Stored row does not describe a product
    #[error("Invalid product row: {0}")]
    InvalidProduct(String),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl CatalogError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::InvalidSearch(_) => "CATALOG_INVALID_SEARCH",
            CatalogError::InvalidNewProduct(_) => "CATALOG_INVALID_NEW_PRODUCT",
            CatalogError::InvalidProduct(_) => "CATALOG_INVALID_PRODUCT",
            CatalogError::Executor(err) => err.code(),
        }
    }
}
