//! # Domain Types
//!
//! Core domain types of the RocketShoes cart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductDetails  │   │    Product      │   │   StockInfo     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id             │   │  id             │       │
//! │  │  metadata       │   │  metadata       │   │  amount         │       │
//! │  └─────────────────┘   │  amount (>= 1)  │   │  (ceiling)      │       │
//! │   from inventory       └────────┬────────┘   └─────────────────┘       │
//! │                                 │ 1..n                                  │
//! │                        ┌────────▼────────┐   ┌─────────────────┐       │
//! │                        │      Cart       │──►│   CartTotals    │       │
//! │                        │  unique by id   │   │  item_count     │       │
//! │                        │  insertion order│   │  total_quantity │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Value Semantics
//! Every `Cart` method that changes contents returns a NEW cart. The store
//! commits the replacement only after it has been persisted, so a failure
//! half-way through an operation can never leak into the visible cart.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

/// Opaque display metadata of a product (`title`, `price`, `image`, ...).
pub type Metadata = Map<String, Value>;

// =============================================================================
// Product Id
// =============================================================================

/// Integer product identifier, unique within a cart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(#[ts(type = "number")] i64);

impl ProductId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId(id)
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Available quantity of a product, as reported by the inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockInfo {
    pub id: ProductId,
    /// Authoritative upper bound for the amount in the cart.
    #[ts(type = "number")]
    pub amount: i64,
}

impl StockInfo {
    pub fn new(id: ProductId, amount: i64) -> Self {
        StockInfo { id, amount }
    }
}

// =============================================================================
// Amount Update
// =============================================================================

/// Request to set the amount of a product, as sent by the cart page.
///
/// `amount` is taken as-is; zero and negative values are rejected by the
/// store, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AmountUpdate {
    pub product_id: ProductId,
    #[ts(type = "number")]
    pub amount: i64,
}

impl AmountUpdate {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        AmountUpdate { product_id, amount }
    }
}

// =============================================================================
// Product Details
// =============================================================================

/// Product as served by the inventory service, before it has an amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub id: ProductId,
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl ProductDetails {
    pub fn new(id: ProductId) -> Self {
        ProductDetails {
            id,
            metadata: Metadata::new(),
        }
    }

    /// Adds a metadata field (builder style, mostly for tests and fixtures).
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Turns the details into a cart entry with the given amount.
    ///
    /// An `amount` key in the metadata would shadow the cart amount once
    /// flattened, so it is dropped.
    pub fn into_product(mut self, amount: i64) -> Product {
        self.metadata.remove("amount");
        Product {
            id: self.id,
            metadata: self.metadata,
            amount,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product line in the cart.
///
/// Serialized flat: `{"id": 5, "title": "X", "price": 139.9, "amount": 1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub metadata: Metadata,
    /// Quantity in the cart, always >= 1 while the product is present.
    pub amount: i64,
}

impl Product {
    /// Returns a metadata field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.metadata.get(name)
    }

    /// Returns the `title` metadata field if it is a string.
    pub fn title(&self) -> Option<&str> {
        self.field("title").and_then(Value::as_str)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered, unique-by-id list of products.
///
/// ## Invariants
/// - Items are unique by `id`
/// - Every `amount` is >= 1
/// - Order is insertion order
///
/// There is no public way to build a `Cart` that breaks these; snapshots
/// read back from storage go through [`Cart::try_from_items`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from raw items, enforcing the cart invariants.
    pub fn try_from_items(items: Vec<Product>) -> CoreResult<Self> {
        crate::validation::validate_items(&items)?;
        Ok(Cart { items })
    }

    pub(crate) fn from_validated(items: Vec<Product>) -> Self {
        Cart { items }
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    /// Returns the number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn amount_of(&self, id: ProductId) -> Option<i64> {
        self.get(id).map(|p| p.amount)
    }

    /// Amount the product would have after adding one more unit.
    ///
    /// `None` when the current amount is already `i64::MAX`.
    pub fn next_amount(&self, id: ProductId) -> Option<i64> {
        self.amount_of(id).unwrap_or(0).checked_add(1)
    }

    /// Returns a copy with the amount of an existing entry replaced.
    pub fn with_amount(&self, id: ProductId, amount: i64) -> CoreResult<Cart> {
        if amount <= 0 {
            return Err(CoreError::InvalidAmount {
                product_id: id,
                amount,
            });
        }

        let mut items = self.items.clone();
        let item = items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::NotInCart(id))?;
        item.amount = amount;

        Ok(Cart { items })
    }

    /// Returns a copy with a new entry appended at the end.
    pub fn with_appended(&self, product: Product) -> CoreResult<Cart> {
        if product.amount <= 0 {
            return Err(CoreError::InvalidAmount {
                product_id: product.id,
                amount: product.amount,
            });
        }

        if self.contains(product.id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: product.id.to_string(),
            }
            .into());
        }

        let mut items = self.items.clone();
        items.push(product);
        Ok(Cart { items })
    }

    /// Returns a copy without the given entry.
    pub fn without(&self, id: ProductId) -> CoreResult<Cart> {
        let index = self
            .items
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::NotInCart(id))?;

        let mut items = self.items.clone();
        items.remove(index);
        Ok(Cart { items })
    }

    /// Returns the total quantity of all items, saturating at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, p| total.saturating_add(p.amount))
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart summary for the header badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Distinct products in the cart.
    pub item_count: usize,
    /// Sum of all amounts.
    #[ts(type = "number")]
    pub total_quantity: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
