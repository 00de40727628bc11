//! # rocketshoes-inventory: Inventory Service Clients
//!
//! The cart treats inventory as an external collaborator reached by a
//! request/response query per product id. This crate defines that seam and
//! ships two implementations.
//!
//! ## Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stock(id)    → StockInfo { id, amount }        ceiling for the cart    │
//! │  product(id)  → ProductDetails { id, ... }      metadata for new lines  │
//! │                                                                         │
//! │  Either may fail (network, not found, bad payload). The cart turns      │
//! │  any such failure into the operation's generic notice.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::Arc;

use rocketshoes_core::{ProductDetails, ProductId, StockInfo};

pub mod error;
pub mod http;
pub mod memory;

pub use error::{InventoryError, InventoryResult};
pub use http::HttpInventory;
pub use memory::MemoryInventory;

/// Stock and product metadata lookups by product id.
pub trait InventoryService: Send + Sync {
    /// Current available quantity of a product.
    fn stock(&self, id: ProductId) -> impl Future<Output = InventoryResult<StockInfo>> + Send;

    /// Display metadata of a product.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = InventoryResult<ProductDetails>> + Send;
}

impl<T: InventoryService> InventoryService for Arc<T> {
    fn stock(&self, id: ProductId) -> impl Future<Output = InventoryResult<StockInfo>> + Send {
        (**self).stock(id)
    }

    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = InventoryResult<ProductDetails>> + Send {
        (**self).product(id)
    }
}
