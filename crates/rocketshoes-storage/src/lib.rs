//! # rocketshoes-storage: Persistent Key/Value Stores
//!
//! Durable storage addressable by a string key, with synchronous get/set of
//! a serialized blob. The cart store writes exactly one value per successful
//! mutation; what that value means is none of this crate's business.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KeyValueStore Backends                             │
//! │                                                                         │
//! │  ┌───────────────────────────┐     ┌───────────────────────────────┐   │
//! │  │        MemoryStore        │     │          FileStore            │   │
//! │  │  ───────────────────────  │     │  ───────────────────────────  │   │
//! │  │  RwLock<HashMap>          │     │  one file per key             │   │
//! │  │  tests, ephemeral carts   │     │  temp file + rename           │   │
//! │  └───────────────────────────┘     │  ~/.local/share/rocketshoes/  │   │
//! │                                    └───────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use rocketshoes_storage::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("@RocketShoes:cart", "[]").unwrap();
//! assert_eq!(store.get("@RocketShoes:cart").unwrap().as_deref(), Some("[]"));
//! ```

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Durable string storage addressable by key.
///
/// Calls are synchronous and not batched. Implementations take `&self` and
/// handle their own interior mutability so a store can sit behind an `Arc`.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}
