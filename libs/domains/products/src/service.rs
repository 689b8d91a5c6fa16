//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, UpdateProduct};
use crate::query::ProductQuery;
use crate::repository::ProductRepository;

/// Validation and orchestration in front of a [`ProductRepository`]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate the draft (name, then price, then category) and insert it
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: NewProduct) -> ProductResult<Product> {
        input.validate()?;
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Matching products, or [`ProductError::NoProducts`] when there are none
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        if query.is_unmatchable() {
            return Err(ProductError::NoProducts);
        }

        let products = self.repository.list(&query).await?;
        if products.is_empty() {
            return Err(ProductError::NoProducts);
        }

        tracing::debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Load, merge the present fields, reject a negative price, save.
    ///
    /// Not atomic: a concurrent writer between load and save is overwritten.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: i32, input: UpdateProduct) -> ProductResult<Product> {
        let mut product = self.get_product(id).await?;

        product.apply_update(input);
        product.validate()?;

        self.repository.save(product).await
    }

    /// `false` when there was nothing to delete
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<bool> {
        self.repository.delete(id).await
    }
}
