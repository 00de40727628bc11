//! # rocketshoes-cart: Cart Store
//!
//! [`CartStore`] holds the cart, validates every change against the
//! inventory and keeps the persisted snapshot in step with memory.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CartStore Operation                                │
//! │                                                                         │
//! │  UI event ──► add_product / remove_product / update_product_amount     │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  1. Take the writer lock (one mutation at a time)                      │
//! │  2. Read the committed cart                                            │
//! │  3. Query inventory (stock, product metadata)   ◄── only await point   │
//! │  4. Build the replacement cart locally                                 │
//! │  5. Write it to the KeyValueStore                                      │
//! │  6. Publish it (watch channel, version + 1)                            │
//! │                   │                                                     │
//! │          failure at any step                                           │
//! │                   ▼                                                     │
//! │  Log with ErrorKind, broadcast Notice, cart unchanged                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use rocketshoes_cart::CartStore;
//! use rocketshoes_core::{ProductDetails, ProductId};
//! use rocketshoes_inventory::MemoryInventory;
//! use rocketshoes_storage::MemoryStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let id = ProductId::new(5);
//! let inventory = MemoryInventory::new()
//!     .with_product(ProductDetails::new(id).with_field("name", "X"), 3);
//!
//! let store = CartStore::open(inventory, MemoryStore::new());
//! store.add_product(id).await.unwrap();
//!
//! assert_eq!(store.cart().amount_of(id), Some(1));
//! # }
//! ```

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::{CartError, CartResult, ErrorKind, Operation};
pub use snapshot::{CartSnapshot, LoadError, LoadOutcome};
pub use store::CartStore;
