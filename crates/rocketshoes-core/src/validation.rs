//! # Validation Module
//!
//! Amount, stock and snapshot checks.
//!
//! ## Where Each Check Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Points                                  │
//! │                                                                         │
//! │  update_product_amount(id, n)                                          │
//! │  └── validate_amount(n)        n <= 0 → InvalidAmount (no stock query) │
//! │                                                                         │
//! │  add_product / update_product_amount                                   │
//! │  └── check_stock(requested, stock)  requested > stock → StockExceeded  │
//! │                                                                         │
//! │  CartStore::open                                                       │
//! │  └── parse_snapshot(raw)       bad JSON / duplicate id / amount < 1    │
//! │                                → empty cart + recoverable load error   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Cart, Product, ProductId, StockInfo};

/// Rejects amounts that are zero or negative.
pub fn validate_amount(product_id: ProductId, amount: i64) -> CoreResult<()> {
    if amount <= 0 {
        return Err(CoreError::InvalidAmount { product_id, amount });
    }
    Ok(())
}

/// Fails when `requested` is above the available stock.
///
/// ## Example
/// ```rust
/// use rocketshoes_core::{ProductId, StockInfo};
/// use rocketshoes_core::validation::check_stock;
///
/// let id = ProductId::new(1);
/// let stock = StockInfo::new(id, 2);
///
/// assert!(check_stock(id, 2, &stock).is_ok());
/// assert!(check_stock(id, 3, &stock).is_err());
/// ```
pub fn check_stock(product_id: ProductId, requested: i64, stock: &StockInfo) -> CoreResult<()> {
    if requested > stock.amount {
        return Err(CoreError::StockExceeded {
            product_id,
            available: stock.amount,
            requested,
        });
    }
    Ok(())
}

/// Checks the cart invariants over a raw item list.
pub fn validate_items(items: &[Product]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        if item.amount < 1 {
            return Err(ValidationError::MustBePositive {
                field: format!("amount of product {}", item.id),
                value: item.amount,
            });
        }

        if !seen.insert(item.id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.to_string(),
            });
        }
    }

    Ok(())
}

/// Parses a persisted snapshot back into a cart.
///
/// Both malformed JSON and a well-formed list that breaks the cart
/// invariants are reported as [`ValidationError`]s.
pub fn parse_snapshot(raw: &str) -> Result<Cart, ValidationError> {
    let items: Vec<Product> =
        serde_json::from_str(raw).map_err(|e| ValidationError::InvalidFormat {
            field: "cart".to_string(),
            reason: e.to_string(),
        })?;

    validate_items(&items)?;
    Ok(Cart::from_validated(items))
}

// =============================================================================
// Unit Tests
// =============================================================================
