//! Inventory store boundary.
//!
//! This crate defines the transactional contract the restock engine needs
//! from the hosted document store, without making any storage assumptions.
//! The in-memory implementation is intended for tests/dev.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use r#trait::{InventoryStore, StockTransaction, StoreError, TransactionBody};
