//! # Cart Store
//!
//! ## Concurrency
//! A UI may fire a second operation while the first is still waiting on the
//! inventory. Both would otherwise start from the same cart and the later
//! commit would silently drop the earlier one. Every mutation therefore runs
//! under a single writer lock, held across the inventory query, and reads
//! the committed cart only once it holds the lock.
//!
//! ```text
//!   add(1) ──lock──► stock(1)… ──► commit v1 ──unlock
//!   add(1) ──────────wait───────────────────────lock──► stock(1)… ──► commit v2
//! ```
//!
//! Readers (`cart`, `snapshot`, `subscribe`) never take the writer lock; they
//! see the last committed snapshot through a `watch` channel.
//!
//! ## Commit Order
//! The replacement cart is written to storage first and published second.
//! If the write fails nothing is published, so memory never runs ahead of
//! storage.

use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, error, info, warn};

use rocketshoes_core::validation::{check_stock, validate_amount};
use rocketshoes_core::{
    AmountUpdate, Cart, CartTotals, CoreError, Notice, ProductId, CART_STORAGE_KEY,
};
use rocketshoes_inventory::InventoryService;
use rocketshoes_storage::KeyValueStore;

use crate::error::{CartResult, ErrorKind, Operation};
use crate::snapshot::{self, CartSnapshot, LoadOutcome};

/// Capacity of the notice channel. Slow subscribers skip old notices.
const NOTICE_CAPACITY: usize = 32;

/// Shopping cart backed by an inventory service and a key/value store.
///
/// Owned by the application root and shared by reference (or `Arc`) with
/// whatever needs to read or change the cart. There is no teardown; dropping
/// the store drops the channels.
pub struct CartStore<I, S> {
    inventory: I,
    storage: S,
    writer: Mutex<()>,
    state: watch::Sender<CartSnapshot>,
    notices: broadcast::Sender<Notice>,
    load_outcome: LoadOutcome,
}

impl<I, S> CartStore<I, S>
where
    I: InventoryService,
    S: KeyValueStore,
{
    /// Opens the store, restoring the persisted cart.
    ///
    /// A missing snapshot gives an empty cart. An unreadable or invalid one
    /// also gives an empty cart, and is reported through [`load_outcome`].
    /// Restored amounts are not checked against current stock.
    ///
    /// [`load_outcome`]: CartStore::load_outcome
    pub fn open(inventory: I, storage: S) -> Self {
        let (cart, load_outcome) = snapshot::load(&storage);
        let (state, _) = watch::channel(CartSnapshot::initial(cart));
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        CartStore {
            inventory,
            storage,
            writer: Mutex::new(()),
            state,
            notices,
            load_outcome,
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Current cart contents.
    pub fn cart(&self) -> Cart {
        self.state.borrow().cart.clone()
    }

    /// Current cart with its version stamp.
    pub fn snapshot(&self) -> CartSnapshot {
        self.state.borrow().clone()
    }

    pub fn totals(&self) -> CartTotals {
        self.state.borrow().cart.totals()
    }

    /// Receives every committed snapshot (for re-rendering).
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.state.subscribe()
    }

    /// Receives user-facing notices emitted by failed operations.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Adds one unit of a product.
    ///
    /// A product already in the cart gets its amount raised by one; a new
    /// one is fetched from the inventory and appended with amount 1. Fails
    /// with `StockExceeded` when the resulting amount is above stock.
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<CartSnapshot> {
        debug!(product_id = %product_id, "add_product");

        let _guard = self.writer.lock().await;
        let result = self.apply_add(product_id).await;
        self.finish(Operation::Add, product_id, result)
    }

    /// Removes a product from the cart. Fails with `NotFound` when absent.
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<CartSnapshot> {
        debug!(product_id = %product_id, "remove_product");

        let _guard = self.writer.lock().await;
        let result = self.apply_remove(product_id);
        self.finish(Operation::Remove, product_id, result)
    }

    /// Sets the amount of a product, appending it when not yet in the cart.
    ///
    /// Amounts <= 0 are rejected before the inventory is queried.
    pub async fn update_product_amount(&self, update: AmountUpdate) -> CartResult<CartSnapshot> {
        let AmountUpdate { product_id, amount } = update;
        debug!(product_id = %product_id, amount, "update_product_amount");

        let _guard = self.writer.lock().await;
        let result = self.apply_update(product_id, amount).await;
        self.finish(Operation::Update, product_id, result)
    }

    // =========================================================================
    // Internals (caller holds the writer lock)
    // =========================================================================

    async fn apply_add(&self, product_id: ProductId) -> CartResult<CartSnapshot> {
        let current = self.cart();

        let stock = self.inventory.stock(product_id).await?;
        // An amount that cannot grow is above any stock level.
        let desired = current
            .next_amount(product_id)
            .ok_or(CoreError::StockExceeded {
                product_id,
                available: stock.amount,
                requested: i64::MAX,
            })?;
        check_stock(product_id, desired, &stock)?;

        let next = if current.contains(product_id) {
            current.with_amount(product_id, desired)?
        } else {
            let details = self.inventory.product(product_id).await?;
            current.with_appended(details.into_product(1))?
        };

        self.commit(next)
    }

    fn apply_remove(&self, product_id: ProductId) -> CartResult<CartSnapshot> {
        let next = self.cart().without(product_id)?;
        self.commit(next)
    }

    async fn apply_update(&self, product_id: ProductId, amount: i64) -> CartResult<CartSnapshot> {
        validate_amount(product_id, amount)?;

        let current = self.cart();

        let stock = self.inventory.stock(product_id).await?;
        check_stock(product_id, amount, &stock)?;

        let next = if current.contains(product_id) {
            current.with_amount(product_id, amount)?
        } else {
            let details = self.inventory.product(product_id).await?;
            current.with_appended(details.into_product(amount))?
        };

        self.commit(next)
    }

    /// Persists `cart`, then publishes it.
    fn commit(&self, cart: Cart) -> CartResult<CartSnapshot> {
        let encoded = snapshot::encode(&cart)?;
        self.storage.set(CART_STORAGE_KEY, &encoded)?;

        let next = self.state.borrow().next(cart);
        self.state.send_replace(next.clone());

        info!(
            version = next.version,
            items = next.cart.len(),
            "Cart committed"
        );
        Ok(next)
    }

    /// Logs a failure with its kind and emits the matching notice.
    fn finish(
        &self,
        operation: Operation,
        product_id: ProductId,
        result: CartResult<CartSnapshot>,
    ) -> CartResult<CartSnapshot> {
        if let Err(ref e) = result {
            let kind = e.kind();
            match kind {
                ErrorKind::Unexpected => {
                    error!(%operation, product_id = %product_id, %kind, error = %e, "Cart operation failed")
                }
                _ => {
                    warn!(%operation, product_id = %product_id, %kind, error = %e, "Cart operation rejected")
                }
            }
            self.notify(operation.notice_for(kind));
        }
        result
    }

    fn notify(&self, notice: Notice) {
        // No subscriber is not an error.
        let _ = self.notices.send(notice);
    }
}

impl<I, S> std::fmt::Debug for CartStore<I, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.state.borrow();
        f.debug_struct("CartStore")
            .field("version", &snapshot.version)
            .field("items", &snapshot.cart.len())
            .field("load_outcome", &self.load_outcome)
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use rocketshoes_core::ProductDetails;

    use crate::error::CartError;
    use rocketshoes_inventory::MemoryInventory;
    use rocketshoes_storage::{FileStore, MemoryStore, StorageError, StorageResult};
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;

    /// Store double whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::WriteFailed {
                    key: key.to_string(),
                    path: "memory".into(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.set(key, value)
        }
    }

    fn id(n: i64) -> ProductId {
        ProductId::new(n)
    }

    fn shoe(n: i64) -> ProductDetails {
        ProductDetails::new(id(n))
            .with_field("title", format!("Shoe {}", n))
            .with_field("price", 139.9)
    }

    fn seeded(raw: &str) -> MemoryStore {
        MemoryStore::with_entry(CART_STORAGE_KEY, raw)
    }

    fn persisted<I: InventoryService, S: KeyValueStore>(store: &CartStore<I, S>) -> Cart {
        let raw = store.storage().get(CART_STORAGE_KEY).unwrap().unwrap();
        rocketshoes_core::validation::parse_snapshot(&raw).unwrap()
    }

    fn drain(rx: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(n) => out.push(n),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
        out
    }

    // -------------------------------------------------------------------------
    // add_product
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_add_new_product_appends_with_amount_one() {
        let inventory = MemoryInventory::new()
            .with_product(ProductDetails::new(id(5)).with_field("name", "X"), 3);
        let store = CartStore::open(inventory, MemoryStore::new());

        let snapshot = store.add_product(id(5)).await.unwrap();

        assert_eq!(snapshot.version, 1);
        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        let line = &cart.items()[0];
        assert_eq!(line.id, id(5));
        assert_eq!(line.amount, 1);
        assert_eq!(line.field("name").and_then(|v| v.as_str()), Some("X"));
        assert_eq!(persisted(&store), cart);
    }

    #[tokio::test]
    async fn test_add_existing_product_increments() {
        let inventory = MemoryInventory::new().with_product(shoe(1), 5);
        let store = CartStore::open(inventory, seeded(r#"[{"id":1,"title":"Shoe 1","amount":2}]"#));

        store.add_product(id(1)).await.unwrap();

        assert_eq!(store.cart().amount_of(id(1)), Some(3));
        assert_eq!(store.inventory().product_queries(), 0);
        assert_eq!(persisted(&store), store.cart());
    }

    #[tokio::test]
    async fn test_add_at_stock_limit_is_rejected() {
        let inventory = MemoryInventory::new().with_product(shoe(1), 2);
        let store = CartStore::open(inventory, seeded(r#"[{"id":1,"amount":2}]"#));
        let mut notices = store.subscribe_notices();
        let before = store.snapshot();

        let err = store.add_product(id(1)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StockExceeded);
        assert_eq!(store.snapshot(), before);
        assert_eq!(drain(&mut notices), vec![Notice::StockExceeded]);
        assert_eq!(
            store.storage().get(CART_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"[{"id":1,"amount":2}]"#)
        );
    }

    #[tokio::test]
    async fn test_add_new_product_with_zero_stock_is_rejected() {
        let inventory = MemoryInventory::new().with_product(shoe(4), 0);
        let store = CartStore::open(inventory, MemoryStore::new());
        let mut notices = store.subscribe_notices();

        let err = store.add_product(id(4)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StockExceeded);
        assert!(store.cart().is_empty());
        assert_eq!(drain(&mut notices), vec![Notice::StockExceeded]);
        assert_eq!(store.storage().get(CART_STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_unknown_product_reports_add_failure() {
        let store = CartStore::open(MemoryInventory::new(), MemoryStore::new());
        let mut notices = store.subscribe_notices();

        let err = store.add_product(id(99)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(matches!(err, CartError::Inventory(_)));
        assert!(store.cart().is_empty());
        assert_eq!(drain(&mut notices), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_add_when_metadata_lookup_fails() {
        let inventory = MemoryInventory::new().with_stock(id(8), 10);
        let store = CartStore::open(inventory, MemoryStore::new());
        let mut notices = store.subscribe_notices();

        assert!(store.add_product(id(8)).await.is_err());

        assert!(store.cart().is_empty());
        assert_eq!(store.snapshot().version, 0);
        assert_eq!(drain(&mut notices), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_add_when_storage_write_fails_leaves_memory_untouched() {
        let inventory = MemoryInventory::new().with_product(shoe(1), 5);
        let storage = FlakyStore::default();
        storage.fail_writes.store(true, Ordering::SeqCst);
        let store = CartStore::open(inventory, storage);
        let mut notices = store.subscribe_notices();

        let err = store.add_product(id(1)).await.unwrap_err();

        assert!(matches!(err, CartError::Storage(_)));
        assert!(store.cart().is_empty());
        assert_eq!(store.snapshot().version, 0);
        assert_eq!(drain(&mut notices), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_add_at_i64_max_amount_is_rejected() {
        let inventory = MemoryInventory::new().with_product(shoe(1), i64::MAX);
        let store = CartStore::open(
            inventory,
            seeded(r#"[{"id":1,"amount":9223372036854775807}]"#),
        );
        let mut notices = store.subscribe_notices();
        let before = store.snapshot();

        let err = store.add_product(id(1)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StockExceeded);
        assert_eq!(store.snapshot(), before);
        assert_eq!(drain(&mut notices), vec![Notice::StockExceeded]);
    }

    #[tokio::test]
    async fn test_totals_of_huge_restored_amounts() {
        let store = CartStore::open(
            MemoryInventory::new(),
            seeded(r#"[{"id":1,"amount":9223372036854775807},{"id":2,"amount":9223372036854775807}]"#),
        );

        assert!(matches!(store.load_outcome(), LoadOutcome::Restored { items: 2 }));
        assert_eq!(store.totals().total_quantity, i64::MAX);
    }

    // -------------------------------------------------------------------------
    // remove_product
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_remove_deletes_exactly_that_entry() {
        let store = CartStore::open(
            MemoryInventory::new(),
            seeded(r#"[{"id":1,"amount":1},{"id":2,"amount":4},{"id":3,"amount":2}]"#),
        );
        let before = store.cart();

        store.remove_product(id(2)).await.unwrap();

        let after = store.cart();
        assert_eq!(after.len(), before.len() - 1);
        assert!(!after.contains(id(2)));
        assert_eq!(after.get(id(1)), before.get(id(1)));
        assert_eq!(after.get(id(3)), before.get(id(3)));
        assert_eq!(persisted(&store), after);
        assert_eq!(store.inventory().stock_queries(), 0);
    }

    #[tokio::test]
    async fn test_remove_absent_reports_remove_failure() {
        let store = CartStore::open(MemoryInventory::new(), seeded(r#"[{"id":1,"amount":1}]"#));
        let mut notices = store.subscribe_notices();
        let before = store.snapshot();

        let err = store.remove_product(id(7)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(matches!(err, CartError::Core(CoreError::NotInCart(_))));
        assert_eq!(store.snapshot(), before);
        assert_eq!(drain(&mut notices), vec![Notice::RemoveFailed]);
    }

    #[tokio::test]
    async fn test_remove_when_storage_write_fails_leaves_memory_untouched() {
        let storage = FlakyStore {
            inner: seeded(r#"[{"id":1,"amount":2}]"#),
            fail_writes: AtomicBool::new(true),
        };
        let store = CartStore::open(MemoryInventory::new(), storage);
        let mut notices = store.subscribe_notices();
        let before = store.snapshot();

        let err = store.remove_product(id(1)).await.unwrap_err();

        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.snapshot().version, 0);
        assert_eq!(drain(&mut notices), vec![Notice::RemoveFailed]);
    }

    // -------------------------------------------------------------------------
    // update_product_amount
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_non_positive_amount_is_rejected_without_stock_query() {
        let inventory = MemoryInventory::new().with_product(shoe(1), 100);
        let store = CartStore::open(inventory, seeded(r#"[{"id":1,"amount":2}]"#));
        let mut notices = store.subscribe_notices();
        let before = store.snapshot();

        for amount in [0, -1, -50] {
            let err = store
                .update_product_amount(AmountUpdate::new(id(1), amount))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidAmount);
        }

        assert_eq!(store.snapshot(), before);
        assert_eq!(store.inventory().stock_queries(), 0);
        assert_eq!(drain(&mut notices), vec![Notice::UpdateFailed; 3]);
    }

    #[tokio::test]
    async fn test_update_above_stock_is_rejected() {
        let inventory = MemoryInventory::new().with_product(shoe(1), 3);
        let store = CartStore::open(inventory, seeded(r#"[{"id":1,"amount":2}]"#));
        let mut notices = store.subscribe_notices();

        let err = store
            .update_product_amount(AmountUpdate::new(id(1), 4))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StockExceeded);
        assert_eq!(store.cart().amount_of(id(1)), Some(2));
        assert_eq!(drain(&mut notices), vec![Notice::StockExceeded]);
    }

    #[tokio::test]
    async fn test_update_existing_sets_exact_amount() {
        let inventory = MemoryInventory::new().with_product(shoe(1), 3);
        let store = CartStore::open(inventory, seeded(r#"[{"id":1,"amount":1}]"#));

        store
            .update_product_amount(AmountUpdate::new(id(1), 3))
            .await
            .unwrap();
        assert_eq!(store.cart().amount_of(id(1)), Some(3));

        store
            .update_product_amount(AmountUpdate::new(id(1), 1))
            .await
            .unwrap();
        assert_eq!(store.cart().amount_of(id(1)), Some(1));
        assert_eq!(persisted(&store), store.cart());
        assert_eq!(store.inventory().product_queries(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_product_appends_with_amount() {
        let inventory = MemoryInventory::new().with_product(shoe(2), 6);
        let store = CartStore::open(inventory, seeded(r#"[{"id":1,"amount":1}]"#));

        store
            .update_product_amount(AmountUpdate::new(id(2), 4))
            .await
            .unwrap();

        let cart = store.cart();
        let ids: Vec<i64> = cart.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(cart.amount_of(id(2)), Some(4));
        assert_eq!(cart.get(id(2)).and_then(|p| p.title()), Some("Shoe 2"));
    }

    #[tokio::test]
    async fn test_update_when_storage_write_fails_leaves_memory_untouched() {
        let inventory = MemoryInventory::new().with_product(shoe(1), 5);
        let storage = FlakyStore {
            inner: seeded(r#"[{"id":1,"amount":1}]"#),
            fail_writes: AtomicBool::new(true),
        };
        let store = CartStore::open(inventory, storage);
        let mut notices = store.subscribe_notices();
        let before = store.snapshot();

        let err = store
            .update_product_amount(AmountUpdate::new(id(1), 3))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.cart().amount_of(id(1)), Some(1));
        assert_eq!(drain(&mut notices), vec![Notice::UpdateFailed]);

        // Writes recover once storage does.
        store.storage().fail_writes.store(false, Ordering::SeqCst);
        store
            .update_product_amount(AmountUpdate::new(id(1), 3))
            .await
            .unwrap();
        assert_eq!(persisted(&store).amount_of(id(1)), Some(3));
    }

    #[tokio::test]
    async fn test_update_when_inventory_unreachable() {
        let store = CartStore::open(MemoryInventory::new(), seeded(r#"[{"id":1,"amount":1}]"#));
        let mut notices = store.subscribe_notices();

        let err = store
            .update_product_amount(AmountUpdate::new(id(1), 2))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(store.cart().amount_of(id(1)), Some(1));
        assert_eq!(drain(&mut notices), vec![Notice::UpdateFailed]);
    }

    // -------------------------------------------------------------------------
    // Persistence & subscribers
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_reload_reproduces_cart() {
        let storage = Arc::new(MemoryStore::new());
        let inventory = Arc::new(
            MemoryInventory::new()
                .with_product(shoe(1), 5)
                .with_product(shoe(2), 5),
        );

        let store = CartStore::open(inventory.clone(), storage.clone());
        store.add_product(id(2)).await.unwrap();
        store.add_product(id(1)).await.unwrap();
        store.add_product(id(2)).await.unwrap();
        store
            .update_product_amount(AmountUpdate::new(id(1), 4))
            .await
            .unwrap();
        let expected = store.cart();
        drop(store);

        let reopened = CartStore::open(inventory, storage);
        assert_eq!(reopened.cart(), expected);
        assert!(matches!(
            reopened.load_outcome(),
            LoadOutcome::Restored { items: 2 }
        ));
    }

    #[tokio::test]
    async fn test_reload_from_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = Arc::new(MemoryInventory::new().with_product(shoe(3), 2));

        {
            let store = CartStore::open(inventory.clone(), FileStore::open(dir.path()).unwrap());
            store.add_product(id(3)).await.unwrap();
            store.add_product(id(3)).await.unwrap();
        }

        let reopened = CartStore::open(inventory, FileStore::open(dir.path()).unwrap());
        assert_eq!(reopened.cart().amount_of(id(3)), Some(2));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_opens_empty() {
        let store = CartStore::open(MemoryInventory::new(), seeded(r#"[{"id":1,"amount":-3}]"#));

        assert!(store.cart().is_empty());
        assert!(store.load_outcome().is_recovered());
    }

    #[tokio::test]
    async fn test_subscribers_see_each_commit() {
        let inventory = MemoryInventory::new().with_product(shoe(1), 5);
        let store = CartStore::open(inventory, MemoryStore::new());
        let mut rx = store.subscribe();

        store.add_product(id(1)).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().version, 1);

        // Rejected operations publish nothing.
        let _ = store.remove_product(id(9)).await;
        assert!(!rx.has_changed().unwrap());

        store.remove_product(id(1)).await.unwrap();
        assert!(rx.borrow_and_update().cart.is_empty());
        assert_eq!(store.totals(), CartTotals { item_count: 0, total_quantity: 0 });
    }

    // -------------------------------------------------------------------------
    // Concurrency
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_adds_do_not_lose_updates() {
        let inventory = MemoryInventory::new()
            .with_product(shoe(1), 10)
            .with_latency(Duration::from_millis(100));
        let store = CartStore::open(inventory, MemoryStore::new());

        let (a, b, c) = tokio::join!(
            store.add_product(id(1)),
            store.add_product(id(1)),
            store.add_product(id(1)),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());

        assert_eq!(store.cart().amount_of(id(1)), Some(3));
        assert_eq!(store.snapshot().version, 3);
        assert_eq!(persisted(&store), store.cart());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_adds_respect_stock() {
        let inventory = MemoryInventory::new()
            .with_product(shoe(1), 1)
            .with_latency(Duration::from_millis(100));
        let store = CartStore::open(inventory, MemoryStore::new());
        let mut notices = store.subscribe_notices();

        let (a, b) = tokio::join!(store.add_product(id(1)), store.add_product(id(1)));

        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(store.cart().amount_of(id(1)), Some(1));
        assert_eq!(drain(&mut notices), vec![Notice::StockExceeded]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_waits_for_pending_add() {
        let inventory = MemoryInventory::new()
            .with_product(shoe(1), 10)
            .with_product(shoe(2), 10)
            .with_latency(Duration::from_millis(100));
        let store = CartStore::open(inventory, seeded(r#"[{"id":2,"amount":1}]"#));

        let (added, removed) =
            tokio::join!(store.add_product(id(1)), store.remove_product(id(2)));
        added.unwrap();
        removed.unwrap();

        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(id(1)), Some(1));
        assert_eq!(persisted(&store), cart);
    }
}
