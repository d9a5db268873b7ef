use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};

use serde_json::Value as JsonValue;

use restock_inventory::{InventoryItemId, STOCK_FIELD};

use super::r#trait::{InventoryStore, StockTransaction, StoreError, TransactionBody};

const DEFAULT_RETRY_BUDGET: u32 = 5;

#[derive(Debug, Clone)]
struct VersionedDocument {
    version: u64,
    body: JsonValue,
}

/// In-memory transactional inventory store.
///
/// Implements the optimistic isolation contract: reads record the document
/// version they observed, commit verifies the read set is still current, and
/// a conflicting write restarts the transaction body from fresh reads.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryInventoryStore {
    documents: RwLock<HashMap<InventoryItemId, VersionedDocument>>,
    retry_budget: u32,
    forced_conflicts: AtomicU32,
}

impl Default for InMemoryInventoryStore {
    fn default() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            retry_budget: DEFAULT_RETRY_BUDGET,
            forced_conflicts: AtomicU32::new(0),
        }
    }
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the optimistic retry budget (attempts per `run_transaction`).
    pub fn with_retry_budget(mut self, retry_budget: u32) -> Self {
        self.retry_budget = retry_budget.max(1);
        self
    }

    /// Insert or replace a document, bumping its version.
    ///
    /// This is the path external CRUD collaborators (inventory forms, order
    /// placement) use; it conflicts with any open transaction that has read
    /// the same record.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned; dropping the write silently would
    /// leave tests asserting against state that was never seeded.
    pub fn upsert(&self, id: InventoryItemId, body: JsonValue) {
        let mut docs = self
            .documents
            .write()
            .expect("inventory store lock poisoned");
        docs.entry(id)
            .and_modify(|doc| {
                doc.version += 1;
                doc.body = body.clone();
            })
            .or_insert(VersionedDocument { version: 1, body });
    }

    /// Point read outside any transaction (no read-set registration).
    pub fn get(&self, id: &InventoryItemId) -> Option<JsonValue> {
        let docs = self.documents.read().ok()?;
        docs.get(id).map(|doc| doc.body.clone())
    }

    /// Test hook: force the next `n` commits to report a conflict.
    pub fn force_conflicts(&self, n: u32) {
        self.forced_conflicts.store(n, Ordering::SeqCst);
    }

    fn try_commit(&self, tx: InMemoryTransaction<'_>) -> Result<(), StoreError> {
        let mut docs = self
            .documents
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let forced = self
            .forced_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if forced.is_ok() {
            return Err(StoreError::Conflict("forced conflict".to_string()));
        }

        // Verify the read set is still current (version 0 = read as absent).
        for (id, seen) in &tx.read_set {
            let current = docs.get(id).map(|doc| doc.version).unwrap_or(0);
            if current != *seen {
                return Err(StoreError::Conflict(format!(
                    "item {id} was modified concurrently (read v{seen}, now v{current})"
                )));
            }
        }

        // Apply staged writes; nothing is durable before this point.
        for (id, stock) in tx.staged {
            let Some(doc) = docs.get_mut(&id) else {
                return Err(StoreError::Conflict(format!(
                    "item {id} disappeared before commit"
                )));
            };
            match doc.body.as_object_mut() {
                Some(fields) => {
                    fields.insert(STOCK_FIELD.to_string(), JsonValue::from(stock));
                }
                None => {
                    return Err(StoreError::Conflict(format!(
                        "item {id} is not an object document"
                    )));
                }
            }
            doc.version += 1;
        }

        Ok(())
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn run_transaction(&self, body: TransactionBody<'_>) -> Result<(), StoreError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let mut tx = InMemoryTransaction {
                store: self,
                read_set: HashMap::new(),
                staged: Vec::new(),
            };

            // Body errors abort the attempt; only commit conflicts retry.
            body(&mut tx)?;

            match self.try_commit(tx) {
                Ok(()) => return Ok(()),
                Err(StoreError::Conflict(_)) if attempts < self.retry_budget => continue,
                Err(StoreError::Conflict(_)) => {
                    return Err(StoreError::RetriesExhausted { attempts });
                }
                Err(other) => return Err(other),
            }
        }
    }
}

struct InMemoryTransaction<'a> {
    store: &'a InMemoryInventoryStore,
    read_set: HashMap<InventoryItemId, u64>,
    staged: Vec<(InventoryItemId, i64)>,
}

impl StockTransaction for InMemoryTransaction<'_> {
    fn read_item(&mut self, id: &InventoryItemId) -> Result<Option<JsonValue>, StoreError> {
        let docs = self
            .store
            .documents
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let doc = docs.get(id);
        let version = doc.map(|d| d.version).unwrap_or(0);

        // Keep the version of the first read; commit validates against it.
        self.read_set.entry(*id).or_insert(version);

        Ok(doc.map(|d| d.body.clone()))
    }

    fn stage_stock(&mut self, id: InventoryItemId, stock: i64) {
        self.staged.push((id, stock));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_core::DocumentId;
    use restock_inventory::stock_of;
    use serde_json::json;

    fn test_item_id() -> InventoryItemId {
        InventoryItemId::new(DocumentId::new())
    }

    fn seed(store: &InMemoryInventoryStore, stock: i64) -> InventoryItemId {
        let id = test_item_id();
        store.upsert(id, json!({ "name": "widget", "stock": stock }));
        id
    }

    #[test]
    fn commit_applies_staged_writes_atomically() {
        let store = InMemoryInventoryStore::new();
        let a = seed(&store, 5);
        let b = seed(&store, 2);

        store
            .run_transaction(&mut |tx: &mut dyn StockTransaction| {
                let stock_a = stock_of(&tx.read_item(&a)?.unwrap()).unwrap();
                let stock_b = stock_of(&tx.read_item(&b)?.unwrap()).unwrap();
                tx.stage_stock(a, stock_a + 3);
                tx.stage_stock(b, stock_b + 1);
                Ok(())
            })
            .unwrap();

        assert_eq!(stock_of(&store.get(&a).unwrap()), Ok(8));
        assert_eq!(stock_of(&store.get(&b).unwrap()), Ok(3));
    }

    #[test]
    fn staged_writes_preserve_other_fields() {
        let store = InMemoryInventoryStore::new();
        let id = seed(&store, 5);

        store
            .run_transaction(&mut |tx: &mut dyn StockTransaction| {
                let _ = tx.read_item(&id)?;
                tx.stage_stock(id, 6);
                Ok(())
            })
            .unwrap();

        let doc = store.get(&id).unwrap();
        assert_eq!(doc.get("name").and_then(JsonValue::as_str), Some("widget"));
        assert_eq!(stock_of(&doc), Ok(6));
    }

    #[test]
    fn concurrent_write_conflicts_and_retries_from_fresh_reads() {
        let store = InMemoryInventoryStore::new();
        let id = seed(&store, 5);

        let mut attempts = 0;
        store
            .run_transaction(&mut |tx: &mut dyn StockTransaction| {
                attempts += 1;
                let stock = stock_of(&tx.read_item(&id)?.unwrap()).unwrap();
                if attempts == 1 {
                    // Another writer sneaks in after the read.
                    store.upsert(id, json!({ "name": "widget", "stock": 7 }));
                }
                tx.stage_stock(id, stock + 3);
                Ok(())
            })
            .unwrap();

        assert_eq!(attempts, 2);
        // Second attempt re-derived the stock from the fresh read.
        assert_eq!(stock_of(&store.get(&id).unwrap()), Ok(10));
    }

    #[test]
    fn read_of_absent_record_is_part_of_the_read_set() {
        let store = InMemoryInventoryStore::new();
        let id = test_item_id();

        let mut attempts = 0;
        store
            .run_transaction(&mut |tx: &mut dyn StockTransaction| {
                attempts += 1;
                let doc = tx.read_item(&id)?;
                if attempts == 1 {
                    assert!(doc.is_none());
                    // Concurrent create of the record we read as absent.
                    store.upsert(id, json!({ "stock": 4 }));
                } else if let Some(doc) = doc {
                    tx.stage_stock(id, stock_of(&doc).unwrap() + 1);
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(attempts, 2);
        assert_eq!(stock_of(&store.get(&id).unwrap()), Ok(5));
    }

    #[test]
    fn exhausted_retry_budget_leaves_state_unchanged() {
        let store = InMemoryInventoryStore::new();
        let id = seed(&store, 5);

        store.force_conflicts(DEFAULT_RETRY_BUDGET);
        let err = store
            .run_transaction(&mut |tx: &mut dyn StockTransaction| {
                let stock = stock_of(&tx.read_item(&id)?.unwrap()).unwrap();
                tx.stage_stock(id, stock + 3);
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::RetriesExhausted {
                attempts: DEFAULT_RETRY_BUDGET
            }
        ));
        assert_eq!(stock_of(&store.get(&id).unwrap()), Ok(5));
    }

    #[test]
    fn commit_succeeds_once_forced_conflicts_drain() {
        let store = InMemoryInventoryStore::new();
        let id = seed(&store, 5);

        store.force_conflicts(2);
        store
            .run_transaction(&mut |tx: &mut dyn StockTransaction| {
                let stock = stock_of(&tx.read_item(&id)?.unwrap()).unwrap();
                tx.stage_stock(id, stock + 1);
                Ok(())
            })
            .unwrap();

        assert_eq!(stock_of(&store.get(&id).unwrap()), Ok(6));
    }

    #[test]
    #[should_panic(expected = "lock poisoned")]
    fn upsert_panics_rather_than_dropping_the_write_after_poison() {
        let store = InMemoryInventoryStore::new();

        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.documents.write().unwrap();
            panic!("poison the documents lock");
        }));

        store.upsert(test_item_id(), json!({ "stock": 1 }));
    }

    #[test]
    fn body_error_aborts_without_retry() {
        let store = InMemoryInventoryStore::new();
        let id = seed(&store, 5);

        let mut attempts = 0;
        let err = store
            .run_transaction(&mut |tx: &mut dyn StockTransaction| {
                attempts += 1;
                let _ = tx.read_item(&id)?;
                tx.stage_stock(id, 99);
                Err(StoreError::Unavailable("simulated outage".to_string()))
            })
            .unwrap_err();

        assert_eq!(attempts, 1);
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(stock_of(&store.get(&id).unwrap()), Ok(5));
    }
}
