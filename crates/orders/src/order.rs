use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use restock_core::DocumentId;
use restock_inventory::InventoryItemId;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub DocumentId);

impl OrderId {
    pub fn new(id: DocumentId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingPayment,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Parse a stored status string; unknown values yield `None`.
    ///
    /// Order documents are written by external forms, so the field may hold
    /// anything. An unknown status must not make a snapshot unreadable.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending_payment" => Some(Self::PendingPayment),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }
}

/// One purchased line as stored, before validation.
///
/// Both fields may be absent or malformed in practice; `validate` turns a
/// raw line into a typed [`LineItem`] or a [`LineItemIssue`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawLineItem {
    pub inventory_item_id: Option<InventoryItemId>,
    pub quantity: Option<i64>,
}

impl RawLineItem {
    pub fn new(inventory_item_id: Option<InventoryItemId>, quantity: Option<i64>) -> Self {
        Self {
            inventory_item_id,
            quantity,
        }
    }

    /// Tolerant extraction from a raw document value.
    ///
    /// A non-object value, a missing field, or a reference that is not a
    /// well-formed id all produce `None` fields rather than a failure.
    pub fn from_document(doc: &JsonValue) -> Self {
        let inventory_item_id = doc
            .get("inventoryItemId")
            .and_then(JsonValue::as_str)
            .and_then(|s| DocumentId::from_str(s).ok())
            .map(InventoryItemId::new);

        let quantity = doc.get("quantity").and_then(JsonValue::as_i64);

        Self {
            inventory_item_id,
            quantity,
        }
    }

    /// Validate into a fully typed line item.
    pub fn validate(&self) -> Result<LineItem, LineItemIssue> {
        let inventory_item_id = self
            .inventory_item_id
            .ok_or(LineItemIssue::MissingReference)?;

        let quantity = self.quantity.ok_or(LineItemIssue::MissingQuantity)?;
        if quantity <= 0 {
            return Err(LineItemIssue::NonPositiveQuantity(quantity));
        }

        Ok(LineItem {
            inventory_item_id,
            quantity,
        })
    }
}

/// A validated order line: reference present, quantity strictly positive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub inventory_item_id: InventoryItemId,
    pub quantity: i64,
}

/// Why a raw line item failed validation.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum LineItemIssue {
    #[error("inventory item reference is missing or malformed")]
    MissingReference,

    #[error("quantity is missing or not an integer")]
    MissingQuantity,

    #[error("quantity is not positive ({0})")]
    NonPositiveQuantity(i64),
}

/// A point-in-time view of an order document.
///
/// Snapshots arrive from the mutation-notification system and may be partial
/// (first-ever snapshot, unknown status strings, absent item list). They are
/// always constructible; validation happens downstream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderSnapshot {
    pub status: Option<OrderStatus>,
    pub items: Vec<RawLineItem>,
}

impl OrderSnapshot {
    pub fn new(status: Option<OrderStatus>, items: Vec<RawLineItem>) -> Self {
        Self { status, items }
    }

    /// Tolerant extraction from a raw order document.
    pub fn from_document(doc: &JsonValue) -> Self {
        let status = doc
            .get("status")
            .and_then(JsonValue::as_str)
            .and_then(OrderStatus::parse);

        let items = doc
            .get("items")
            .and_then(JsonValue::as_array)
            .map(|items| items.iter().map(RawLineItem::from_document).collect())
            .unwrap_or_default();

        Self { status, items }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == Some(OrderStatus::Cancelled)
    }
}
