//! Inventory domain module.
//!
//! This crate contains the inventory side of the data model: the typed item
//! identifier and defensive interpretation of raw stock-keeping documents
//! (no IO, no HTTP, no storage).

pub mod item;

pub use item::{InventoryItemId, STOCK_FIELD, StockFieldError, stock_of};
