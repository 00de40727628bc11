//! # Notices
//!
//! User-facing warnings emitted by the cart. The UI shows them as toasts;
//! the wording is fixed and never includes error details.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Desired or requested amount is above the available stock.
    StockExceeded,
    /// `add_product` failed for any other reason.
    AddFailed,
    /// `remove_product` failed (product not in the cart, storage error).
    RemoveFailed,
    /// `update_product_amount` failed (amount <= 0, lookup or storage error).
    UpdateFailed,
}

impl Notice {
    /// Message shown to the shopper.
    pub const fn message(&self) -> &'static str {
        match self {
            Notice::StockExceeded => "Requested quantity exceeds stock",
            Notice::AddFailed => "Failed to add product",
            Notice::RemoveFailed => "Failed to remove product",
            Notice::UpdateFailed => "Failed to update product quantity",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
