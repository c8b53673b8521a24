//! In-Memory Record Store
//!
//! Three id-keyed tables behind a single lock, so a write and its referential
//! checks (and cascades) happen atomically.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::models::{Category, CategoryPayload, Product, ProductPayload, Stock, StockPayload};
use crate::resource::Resource;
use crate::store::{RecordStore, StoreResult};

// == Tables ==
#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<u64, Category>,
    products: BTreeMap<u64, Product>,
    stock: BTreeMap<u64, Stock>,
    last_category_id: u64,
    last_product_id: u64,
    last_stock_id: u64,
}

impl Tables {
    fn require_category(&self, id: u64) -> StoreResult<()> {
        if self.categories.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::dangling_reference("category", id))
        }
    }

    fn require_product(&self, id: u64) -> StoreResult<()> {
        if self.products.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::dangling_reference("product", id))
        }
    }

    /// Drops stock rows pointing at any of `product_ids`. Returns how many went.
    fn drop_stock_for(&mut self, product_ids: &[u64]) -> usize {
        let before = self.stock.len();
        self.stock.retain(|_, s| !product_ids.contains(&s.product));
        before - self.stock.len()
    }
}

fn not_found<R: Resource>(id: u64) -> StoreError {
    StoreError::NotFound {
        resource: R::NAME,
        id,
    }
}

// == Memory Store ==
/// Process-local store for all three inventory tables.
///
/// Cloning yields another handle to the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// == Category Table ==
#[async_trait]
impl RecordStore<Category> for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn get(&self, id: u64) -> StoreResult<Category> {
        self.tables
            .read()
            .await
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found::<Category>(id))
    }

    async fn insert(&self, payload: CategoryPayload) -> StoreResult<Category> {
        let mut tables = self.tables.write().await;
        tables.last_category_id += 1;
        let category = Category {
            id: tables.last_category_id,
            name: payload.name,
            description: payload.description,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: u64, payload: CategoryPayload) -> StoreResult<Category> {
        let mut tables = self.tables.write().await;
        let category = tables
            .categories
            .get_mut(&id)
            .ok_or_else(|| not_found::<Category>(id))?;
        category.name = payload.name;
        category.description = payload.description;
        Ok(category.clone())
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Err(not_found::<Category>(id));
        }

        // Cascade: products of this category, then their stock
        let orphaned: Vec<u64> = tables
            .products
            .values()
            .filter(|p| p.category == id)
            .map(|p| p.id)
            .collect();
        for product_id in &orphaned {
            tables.products.remove(product_id);
        }
        let stock_removed = tables.drop_stock_for(&orphaned);

        if !orphaned.is_empty() {
            debug!(
                category_id = id,
                products = orphaned.len(),
                stock = stock_removed,
                "Cascaded category delete"
            );
        }
        Ok(())
    }
}

// == Product Table ==
#[async_trait]
impl RecordStore<Product> for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn get(&self, id: u64) -> StoreResult<Product> {
        self.tables
            .read()
            .await
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found::<Product>(id))
    }

    async fn insert(&self, payload: ProductPayload) -> StoreResult<Product> {
        let mut tables = self.tables.write().await;
        tables.require_category(payload.category)?;

        tables.last_product_id += 1;
        let product = Product {
            id: tables.last_product_id,
            name: payload.name,
            category: payload.category,
            price: payload.price,
            description: payload.description,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: u64, payload: ProductPayload) -> StoreResult<Product> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Err(not_found::<Product>(id));
        }
        tables.require_category(payload.category)?;

        let product = tables
            .products
            .get_mut(&id)
            .ok_or_else(|| not_found::<Product>(id))?;
        product.name = payload.name;
        product.category = payload.category;
        product.price = payload.price;
        product.description = payload.description;
        Ok(product.clone())
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.products.remove(&id).is_none() {
            return Err(not_found::<Product>(id));
        }

        let stock_removed = tables.drop_stock_for(&[id]);
        if stock_removed > 0 {
            debug!(product_id = id, stock = stock_removed, "Cascaded product delete");
        }
        Ok(())
    }
}

// == Stock Table ==
#[async_trait]
impl RecordStore<Stock> for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Stock>> {
        Ok(self.tables.read().await.stock.values().cloned().collect())
    }

    async fn get(&self, id: u64) -> StoreResult<Stock> {
        self.tables
            .read()
            .await
            .stock
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found::<Stock>(id))
    }

    async fn insert(&self, payload: StockPayload) -> StoreResult<Stock> {
        let mut tables = self.tables.write().await;
        tables.require_product(payload.product)?;

        tables.last_stock_id += 1;
        let stock = Stock {
            id: tables.last_stock_id,
            product: payload.product,
            quantity: payload.quantity,
        };
        tables.stock.insert(stock.id, stock.clone());
        Ok(stock)
    }

    async fn update(&self, id: u64, payload: StockPayload) -> StoreResult<Stock> {
        let mut tables = self.tables.write().await;
        if !tables.stock.contains_key(&id) {
            return Err(not_found::<Stock>(id));
        }
        tables.require_product(payload.product)?;

        let stock = tables
            .stock
            .get_mut(&id)
            .ok_or_else(|| not_found::<Stock>(id))?;
        stock.product = payload.product;
        stock.quantity = payload.quantity;
        Ok(stock.clone())
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .stock
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found::<Stock>(id))
    }
}
