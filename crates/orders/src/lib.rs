//! Orders domain module.
//!
//! This crate contains the order side of the data model: status, tolerant
//! snapshot parsing from raw documents, and line-item validation
//! (no IO, no HTTP, no storage).

pub mod order;

pub use order::{
    LineItem, LineItemIssue, OrderId, OrderSnapshot, OrderStatus, RawLineItem,
};
