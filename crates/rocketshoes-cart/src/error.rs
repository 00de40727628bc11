//! # Cart Error Types
//!
//! Every failure of a cart operation ends up as a [`CartError`]. The store
//! logs it with its [`ErrorKind`] and the [`Operation`] it interrupted, then
//! maps the pair to the notice the shopper sees.
//!
//! ## Kind → Notice
//! ```text
//! ┌──────────────────┬───────────────┬───────────────┬───────────────────┐
//! │ ErrorKind        │ Add           │ Remove        │ Update            │
//! ├──────────────────┼───────────────┼───────────────┼───────────────────┤
//! │ StockExceeded    │ StockExceeded │      -        │ StockExceeded     │
//! │ NotFound         │ AddFailed     │ RemoveFailed  │ UpdateFailed      │
//! │ InvalidAmount    │ AddFailed     │ RemoveFailed  │ UpdateFailed      │
//! │ Unexpected       │ AddFailed     │ RemoveFailed  │ UpdateFailed      │
//! └──────────────────┴───────────────┴───────────────┴───────────────────┘
//! ```

use std::fmt;

use rocketshoes_core::{CoreError, Notice};
use rocketshoes_inventory::InventoryError;
use rocketshoes_storage::StorageError;
use thiserror::Error;

/// Result type alias for cart operations.
pub type CartResult<T> = Result<T, CartError>;

#[derive(Debug, Error)]
pub enum CartError {
    /// A cart rule was violated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Stock or product lookup failed.
    #[error("Inventory lookup failed: {0}")]
    Inventory(#[from] InventoryError),

    /// Persisting the snapshot failed.
    #[error("Cart storage failed: {0}")]
    Storage(#[from] StorageError),

    /// Encoding the snapshot failed.
    #[error("Cart serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Category of a cart failure, kept for logs even though the notice shown to
/// the shopper is generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StockExceeded,
    NotFound,
    InvalidAmount,
    Unexpected,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::StockExceeded => "stock_exceeded",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidAmount => "invalid_amount",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::Core(CoreError::StockExceeded { .. }) => ErrorKind::StockExceeded,
            CartError::Core(CoreError::NotInCart(_)) => ErrorKind::NotFound,
            CartError::Core(CoreError::InvalidAmount { .. }) => ErrorKind::InvalidAmount,
            CartError::Core(CoreError::Validation(_))
            | CartError::Inventory(_)
            | CartError::Storage(_)
            | CartError::Serialization(_) => ErrorKind::Unexpected,
        }
    }
}

/// The cart operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add_product",
            Operation::Remove => "remove_product",
            Operation::Update => "update_product_amount",
        }
    }

    /// Generic notice for any failure of this operation.
    pub const fn failure_notice(&self) -> Notice {
        match self {
            Operation::Add => Notice::AddFailed,
            Operation::Remove => Notice::RemoveFailed,
            Operation::Update => Notice::UpdateFailed,
        }
    }

    /// Notice shown when this operation fails with `kind`.
    pub const fn notice_for(&self, kind: ErrorKind) -> Notice {
        match kind {
            ErrorKind::StockExceeded => Notice::StockExceeded,
            _ => self.failure_notice(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
