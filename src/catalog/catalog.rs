//! Product catalog use cases

use crate::config::PaginationConfig;
use crate::criteria::{Criteria, Page, PaginationQuery};
use crate::executor::{ExecutorError, QueryExecutor, RowWriter};
use crate::observability::{Event, Logger};
use crate::schema::EntityRegistry;
use crate::translator::{build_query, CriteriaSpecification, QueryTranslator};

use super::errors::CatalogResult;
use super::product::{NewProduct, Product, PRODUCT_ENTITY};
use super::search::ProductSearch;

/// Product search, listing and creation over a store.
///
/// The registry must contain the product entity.
pub struct ProductCatalog<'a, E: QueryExecutor> {
    executor: &'a mut E,
    registry: &'a EntityRegistry,
    pagination: PaginationConfig,
}

impl<'a, E: QueryExecutor> ProductCatalog<'a, E> {
    pub fn new(
        executor: &'a mut E,
        registry: &'a EntityRegistry,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            executor,
            registry,
            pagination,
        }
    }

    /// Products matching every present search field
    pub fn search(&self, search: &ProductSearch) -> CatalogResult<Vec<Product>> {
        search.validate()?;

        let criteria = search.to_criteria();
        let spec = CriteriaSpecification::from_criteria(&criteria);
        let query =
            build_query(&spec, self.registry, PRODUCT_ENTITY).map_err(ExecutorError::from)?;

        self.executor
            .fetch(&query)?
            .iter()
            .map(Product::from_row)
            .collect()
    }

    /// One page of all products
    pub fn paginated(&self, request: PaginationQuery) -> CatalogResult<Page<Product>> {
        let pagination = request.resolve(&self.pagination);
        let query = QueryTranslator::with_shared_factory(self.registry)
            .translate(&Criteria::default(), PRODUCT_ENTITY)
            .map_err(ExecutorError::from)?;

        self.executor
            .fetch_page(&query, pagination)?
            .try_map(|row| Product::from_row(&row))
    }
}

impl<E: QueryExecutor + RowWriter> ProductCatalog<'_, E> {
    /// Validates and stores a new product
    pub fn create(
        &mut self,
        name: impl Into<String>,
        price: f64,
        quantity: i64,
    ) -> CatalogResult<Product> {
        let product = NewProduct::new(name, price, quantity).into_product()?;
        self.executor.write_row(PRODUCT_ENTITY, product.to_row())?;

        let id = product.id.to_string();
        Logger::trace(
            Event::ProductCreated,
            &[("id", id.as_str()), ("name", product.name.as_str())],
        );

        Ok(product)
    }
}
