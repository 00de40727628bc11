//! In-memory inventory for tests and offline demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use rocketshoes_core::{ProductDetails, ProductId, StockInfo};

use crate::error::{InventoryError, InventoryResult};
use crate::InventoryService;

/// Catalog held in memory.
///
/// Stock and product details are kept separately so a fixture can have a
/// stock entry whose metadata lookup fails.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    stock: RwLock<HashMap<ProductId, i64>>,
    products: RwLock<HashMap<ProductId, ProductDetails>>,
    latency: Option<Duration>,
    stock_queries: AtomicUsize,
    product_queries: AtomicUsize,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product with its stock level.
    pub fn with_product(self, details: ProductDetails, stock: i64) -> Self {
        let id = details.id;
        self.insert_product(details);
        self.set_stock(id, stock);
        self
    }

    /// Adds a stock level without product details.
    pub fn with_stock(self, id: ProductId, stock: i64) -> Self {
        self.set_stock(id, stock);
        self
    }

    /// Every query sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_stock(&self, id: ProductId, amount: i64) {
        if let Ok(mut stock) = self.stock.write() {
            stock.insert(id, amount);
        }
    }

    pub fn insert_product(&self, details: ProductDetails) {
        if let Ok(mut products) = self.products.write() {
            products.insert(details.id, details);
        }
    }

    /// Number of `stock` queries answered or failed so far.
    pub fn stock_queries(&self) -> usize {
        self.stock_queries.load(Ordering::SeqCst)
    }

    /// Number of `product` queries answered or failed so far.
    pub fn product_queries(&self) -> usize {
        self.product_queries.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl InventoryService for MemoryInventory {
    async fn stock(&self, id: ProductId) -> InventoryResult<StockInfo> {
        self.stock_queries.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let stock = self
            .stock
            .read()
            .map_err(|_| InventoryError::Unavailable("stock table poisoned".to_string()))?;

        stock
            .get(&id)
            .map(|amount| StockInfo::new(id, *amount))
            .ok_or(InventoryError::NotFound(id))
    }

    async fn product(&self, id: ProductId) -> InventoryResult<ProductDetails> {
        self.product_queries.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let products = self
            .products
            .read()
            .map_err(|_| InventoryError::Unavailable("product table poisoned".to_string()))?;

        products.get(&id).cloned().ok_or(InventoryError::NotFound(id))
    }
}
