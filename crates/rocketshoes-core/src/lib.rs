//! # rocketshoes-core: Pure Cart Rules for RocketShoes
//!
//! This crate holds the cart rules as pure functions with zero I/O
//! dependencies. Storage, inventory lookups and notification delivery live in
//! the crates layered on top of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     RocketShoes Cart Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront UI / rocketshoes CLI                    │   │
//! │  │    Product grid ──► Cart badge ──► Cart page (+/-, remove)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 rocketshoes-cart (CartStore)                    │   │
//! │  │     add_product, remove_product, update_product_amount          │   │
//! │  └──────────┬──────────────────┬──────────────────────┬────────────┘   │
//! │             │                  │                      │                 │
//! │  ┌──────────▼───────┐ ┌────────▼───────────┐ ┌────────▼────────────┐   │
//! │  │ ★ THIS CRATE ★   │ │ rocketshoes-storage│ │rocketshoes-inventory│   │
//! │  │ Cart, Product,   │ │ "@RocketShoes:cart"│ │ /stock, /products   │   │
//! │  │ StockInfo, rules │ │                    │ │                     │   │
//! │  └──────────────────┘ └────────────────────┘ └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Cart, StockInfo, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Amount, stock and snapshot checks
//! - [`notice`] - User-facing notices
//!
//! ## Example Usage
//!
//! ```rust
//! use rocketshoes_core::{Cart, ProductDetails, ProductId, StockInfo};
//! use rocketshoes_core::validation::check_stock;
//!
//! let cart = Cart::new();
//! let id = ProductId::new(5);
//! let stock = StockInfo::new(id, 3);
//!
//! let desired = cart.next_amount(id).unwrap();
//! check_stock(id, desired, &stock).unwrap();
//!
//! let details = ProductDetails::new(id).with_field("title", "X");
//! let cart = cart.with_appended(details.into_product(desired)).unwrap();
//! assert_eq!(cart.amount_of(id), Some(1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod notice;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use notice::Notice;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the cart snapshot is persisted under.
///
/// Kept byte-identical to the key the web storefront writes so a snapshot
/// saved by either side can be restored by the other.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";
