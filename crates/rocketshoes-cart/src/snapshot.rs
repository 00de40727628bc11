//! # Cart Snapshots
//!
//! The committed cart as seen by subscribers, and the load path that turns
//! whatever is in storage into a valid starting cart.
//!
//! ## Load Outcomes
//! ```text
//! storage.get("@RocketShoes:cart")
//!      │
//!      ├── None ─────────────────────────────► Empty
//!      ├── Some(valid snapshot) ─────────────► Restored { items }
//!      ├── Some(bad JSON / duplicate / 0) ───► Recovered(Invalid)  + empty cart
//!      └── Err(read failure) ────────────────► Recovered(Unreadable) + empty cart
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use rocketshoes_core::validation::parse_snapshot;
use rocketshoes_core::{Cart, ValidationError, CART_STORAGE_KEY};
use rocketshoes_storage::{KeyValueStore, StorageError};

/// The committed cart plus a version stamp.
///
/// `version` starts at 0 for the loaded cart and increases by one on every
/// successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub version: u64,
    pub committed_at: DateTime<Utc>,
    pub cart: Cart,
}

impl CartSnapshot {
    pub(crate) fn initial(cart: Cart) -> Self {
        CartSnapshot {
            version: 0,
            committed_at: Utc::now(),
            cart,
        }
    }

    pub(crate) fn next(&self, cart: Cart) -> Self {
        CartSnapshot {
            version: self.version + 1,
            committed_at: Utc::now(),
            cart,
        }
    }
}

/// Why a stored snapshot could not be restored.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("stored cart could not be read: {0}")]
    Unreadable(#[from] StorageError),

    #[error("stored cart is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

/// What happened when the store was opened.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing was stored; the cart starts empty.
    Empty,
    /// A valid snapshot was restored.
    Restored { items: usize },
    /// The stored snapshot was discarded and the cart starts empty.
    Recovered(LoadError),
}

impl LoadOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadOutcome::Recovered(_))
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadOutcome::Recovered(e) => Some(e),
            _ => None,
        }
    }
}

/// Reads the persisted cart. Never fails: anything unusable yields an empty
/// cart and a [`LoadOutcome::Recovered`].
pub(crate) fn load<S: KeyValueStore>(storage: &S) -> (Cart, LoadOutcome) {
    let raw = match storage.get(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored cart, starting empty");
            return (Cart::new(), LoadOutcome::Empty);
        }
        Err(e) => {
            warn!(error = %e, "Stored cart unreadable, starting empty");
            return (Cart::new(), LoadOutcome::Recovered(e.into()));
        }
    };

    match parse_snapshot(&raw) {
        Ok(cart) => {
            info!(items = cart.len(), "Cart restored from storage");
            let items = cart.len();
            (cart, LoadOutcome::Restored { items })
        }
        Err(e) => {
            warn!(error = %e, "Stored cart invalid, starting empty");
            (Cart::new(), LoadOutcome::Recovered(e.into()))
        }
    }
}

/// Encodes a cart in the persisted format (a JSON array of products).
pub(crate) fn encode(cart: &Cart) -> serde_json::Result<String> {
    serde_json::to_string(cart)
}
