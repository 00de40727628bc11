//! # Error Types
//!
//! Domain-specific error types for rocketshoes-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rocketshoes-core errors (this file)                                   │
//! │  ├── CoreError        - Cart rule violations                           │
//! │  └── ValidationError  - Malformed input or persisted snapshot          │
//! │                                                                         │
//! │  rocketshoes-storage  └── StorageError                                 │
//! │  rocketshoes-inventory└── InventoryError                               │
//! │                                                                         │
//! │  rocketshoes-cart                                                      │
//! │  └── CartError        - Wraps all of the above, carries an ErrorKind   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError → Notice → UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Cart rule violations.
///
/// None of these leave the cart modified; the store turns each one into a
/// user-facing [`Notice`](crate::Notice).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The requested amount is above what the inventory has available.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "+" on a product already in the cart (amount: 2)
    ///      │
    ///      ▼
    /// Query stock: available=2
    ///      │
    ///      ▼
    /// StockExceeded { product_id: 1, available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Requested quantity exceeds stock"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    StockExceeded {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// The product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The requested amount is zero or negative.
    #[error("Invalid amount {amount} for product {product_id}")]
    InvalidAmount { product_id: ProductId, amount: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Snapshot and input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: String, value: i64 },

    /// The same product id appears more than once.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// The payload does not have the expected shape.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
