use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use restock_core::DocumentId;

/// Inventory item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryItemId(pub DocumentId);

impl InventoryItemId {
    pub fn new(id: DocumentId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InventoryItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Field name of the on-hand quantity in a raw inventory document.
pub const STOCK_FIELD: &str = "stock";

/// The `stock` field of a stored document could not be interpreted.
///
/// Inventory records are maintained by external CRUD forms without a schema,
/// so the field must be validated on every read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockFieldError {
    #[error("stock field is missing")]
    Missing,

    #[error("stock field is not an integer")]
    NotAnInteger,

    #[error("stock is negative ({0})")]
    Negative(i64),
}

/// Interpret the on-hand stock of a raw inventory document.
///
/// Accepts only a non-negative integer; anything else (absent field,
/// string, float, negative number) is a malformed record.
pub fn stock_of(doc: &JsonValue) -> Result<i64, StockFieldError> {
    let field = doc.get(STOCK_FIELD).ok_or(StockFieldError::Missing)?;
    let stock = field.as_i64().ok_or(StockFieldError::NotAnInteger)?;
    if stock < 0 {
        return Err(StockFieldError::Negative(stock));
    }
    Ok(stock)
}
