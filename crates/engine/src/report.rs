//! Outcome reporting for restock attempts.

use thiserror::Error;

use restock_inventory::{InventoryItemId, StockFieldError};
use restock_orders::{LineItemIssue, OrderId};
use restock_store::StoreError;

/// Why a line item was excluded from the credit batch.
///
/// Skips are per-item and never abort the surrounding transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The line failed validation before any store read (warn-level).
    #[error("invalid line item: {0}")]
    InvalidLineItem(LineItemIssue),

    /// The referenced inventory record does not exist (error-level; points
    /// at a dangling reference upstream).
    #[error("inventory record missing")]
    RecordMissing,

    /// The inventory record exists but its stock cannot be interpreted
    /// (error-level).
    #[error("inventory record malformed: {0}")]
    RecordMalformed(StockFieldError),

    /// Crediting the quantity would overflow the stored stock value
    /// (error-level; the stored stock stays untouched).
    #[error("stock credit overflows the stored value")]
    CreditOverflow,
}

impl SkipReason {
    /// Stable reason code for structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::InvalidLineItem(_) => "invalid_line_item",
            SkipReason::RecordMissing => "inventory_record_missing",
            SkipReason::RecordMalformed(_) => "inventory_record_malformed",
            SkipReason::CreditOverflow => "stock_credit_overflow",
        }
    }
}

/// A line item that was skipped, with its position in the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// 1-based position of the line in the order's item list.
    pub line_no: usize,
    /// The referenced item, when the reference itself was readable.
    pub item_id: Option<InventoryItemId>,
    pub reason: SkipReason,
}

/// Terminal outcome of one restock attempt.
#[derive(Debug)]
pub enum RestockOutcome {
    /// The transaction committed and at least one item was credited.
    /// Skipped items (if any) make this a partial, still successful, credit.
    Credited,

    /// Every line item was skipped; no writes were staged or committed.
    NothingCredited,

    /// The transaction failed (retry budget exhausted or store unavailable).
    /// No partial writes are durable; inventory is unchanged.
    Failed(StoreError),
}

impl RestockOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, RestockOutcome::Failed(_))
    }
}

/// Aggregated result of one restock invocation.
#[derive(Debug)]
pub struct RestockReport {
    pub order_id: OrderId,
    /// Items whose stock credit was committed, in order-line order.
    pub credited: Vec<InventoryItemId>,
    pub skipped: Vec<SkippedItem>,
    pub outcome: RestockOutcome,
}
