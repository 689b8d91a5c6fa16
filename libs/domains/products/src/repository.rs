use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product};
use crate::query::ProductQuery;

/// Repository trait for Product persistence
///
/// Every call is its own unit of work. Writes that would break name
/// uniqueness fail with [`ProductError::DuplicateName`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product; the store assigns the id
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// Products matching the query's filter, in its order
    async fn list(&self, query: &ProductQuery) -> ProductResult<Vec<Product>>;

    /// Overwrite every column of the row with `product.id`
    async fn save(&self, product: Product) -> ProductResult<Product>;

    /// `false` when no row had that id
    async fn delete(&self, id: i32) -> ProductResult<bool>;
}

/// In-memory implementation of ProductRepository (for development/testing)
///
/// Ids come from a sequence that, like a serial column, is not reused
/// after a failed insert.
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<i32, Product>>>,
    next_id: Arc<AtomicI32>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI32::new(1)),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut products = self.products.write().await;

        if products.values().any(|p| p.name == input.name) {
            return Err(ProductError::DuplicateName(input.name));
        }

        let product = Product {
            id,
            name: input.name,
            price: input.price,
            expiry: input.expiry,
            category_id: input.category_id,
        };
        products.insert(id, product.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list(&self, query: &ProductQuery) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        query.sort(&mut result);

        Ok(result)
    }

    async fn save(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if !products.contains_key(&product.id) {
            return Err(ProductError::NotFound(product.id.to_string()));
        }

        if products
            .values()
            .any(|p| p.id != product.id && p.name == product.name)
        {
            return Err(ProductError::DuplicateName(product.name));
        }

        products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Saved product");
        Ok(product)
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
