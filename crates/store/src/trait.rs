use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;

use restock_inventory::InventoryItemId;

/// Store operation error.
///
/// These are **infrastructure errors** (concurrency, availability) as opposed
/// to domain errors (validation, malformed records). Domain-level problems
/// with individual documents are handled by the caller, per item.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record in the transaction's read set was modified concurrently.
    ///
    /// Consumed internally by `run_transaction`'s retry loop; it only
    /// escapes an implementation that does not retry.
    #[error("transaction conflict: {0}")]
    Conflict(String),

    /// The optimistic retry budget was exhausted without a clean commit.
    #[error("transaction retry budget exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// The store could not be reached or is in an unusable state.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// An open transaction against the inventory store.
///
/// Reads are registered in the transaction's read set so the store can detect
/// conflicting concurrent writes to the same records before commit
/// (optimistic isolation, no manual locks). Writes are staged and become
/// durable only on commit, all or nothing.
pub trait StockTransaction {
    /// Transactional point read of an inventory document.
    ///
    /// Returns `None` when the record does not exist; the absence itself is
    /// part of the read set (a concurrent create is a conflict).
    fn read_item(&mut self, id: &InventoryItemId) -> Result<Option<JsonValue>, StoreError>;

    /// Stage a write of the item's stock, committed atomically with all
    /// other staged writes.
    fn stage_stock(&mut self, id: InventoryItemId, stock: i64);
}

/// Transaction body signature accepted by [`InventoryStore::run_transaction`].
pub type TransactionBody<'a> =
    &'a mut dyn FnMut(&mut dyn StockTransaction) -> Result<(), StoreError>;

/// Transactional access to inventory records (the store adapter contract).
///
/// `run_transaction` executes `body` under optimistic isolation and retries
/// the **whole body** from fresh reads when a commit-time conflict is
/// detected, up to the implementation's retry budget. Bodies must therefore
/// re-derive any staged state from the reads of the current attempt.
///
/// Errors returned by the body abort the attempt without retrying; commit
/// conflicts are the only retried failure.
pub trait InventoryStore: Send + Sync {
    fn run_transaction(&self, body: TransactionBody<'_>) -> Result<(), StoreError>;
}

impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    fn run_transaction(&self, body: TransactionBody<'_>) -> Result<(), StoreError> {
        (**self).run_transaction(body)
    }
}

impl<S> InventoryStore for &S
where
    S: InventoryStore + ?Sized,
{
    fn run_transaction(&self, body: TransactionBody<'_>) -> Result<(), StoreError> {
        (**self).run_transaction(body)
    }
}
