//! Restock transaction execution.

use tracing::{error, info, warn};

use restock_inventory::{InventoryItemId, stock_of};
use restock_orders::{LineItem, OrderId, RawLineItem};
use restock_store::{InventoryStore, StockTransaction, StoreError};

use crate::report::{RestockOutcome, RestockReport, SkipReason, SkippedItem};

/// Credits reserved stock back to inventory for a cancelled order.
///
/// One invocation runs one atomic transaction: per-item validation failures
/// and unreadable inventory records are isolated skips, and the staged
/// credits commit all-or-nothing. The executor provides **no** protection
/// against a second invocation for the same cancellation; that is the
/// dispatcher/platform layer's documented gap.
pub struct RestockExecutor<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> RestockExecutor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Credit `stock += quantity` for every valid line item, in one
    /// transaction against the inventory store.
    pub fn restock(&self, order_id: OrderId, items: &[RawLineItem]) -> RestockReport {
        info!(%order_id, items = items.len(), "restocking cancelled order");

        // Step 1: validate every line up front. Invalid lines never reach a
        // store read and do not abort the rest.
        let mut valid: Vec<(usize, LineItem)> = Vec::with_capacity(items.len());
        let mut skipped: Vec<SkippedItem> = Vec::new();
        for (idx, raw) in items.iter().enumerate() {
            let line_no = idx + 1;
            match raw.validate() {
                Ok(line) => valid.push((line_no, line)),
                Err(issue) => {
                    warn!(
                        %order_id,
                        line_no,
                        reason = "invalid_line_item",
                        detail = %issue,
                        "skipping line item"
                    );
                    skipped.push(SkippedItem {
                        line_no,
                        item_id: raw.inventory_item_id,
                        reason: SkipReason::InvalidLineItem(issue),
                    });
                }
            }
        }

        if valid.is_empty() {
            info!(%order_id, skipped = skipped.len(), "no valid line items; nothing to credit");
            return RestockReport {
                order_id,
                credited: Vec::new(),
                skipped,
                outcome: RestockOutcome::NothingCredited,
            };
        }

        // Steps 2-5: read, stage, commit. The body may run several times
        // under optimistic retry, so everything it produces is re-derived
        // from the fresh reads of the current attempt.
        let mut credited: Vec<InventoryItemId> = Vec::new();
        let mut unreadable: Vec<SkippedItem> = Vec::new();
        let result = self.store.run_transaction(&mut |tx: &mut dyn StockTransaction| {
            credited.clear();
            unreadable.clear();

            for (line_no, line) in &valid {
                let item_id = line.inventory_item_id;
                match tx.read_item(&item_id)? {
                    None => unreadable.push(SkippedItem {
                        line_no: *line_no,
                        item_id: Some(item_id),
                        reason: SkipReason::RecordMissing,
                    }),
                    Some(doc) => match stock_of(&doc) {
                        // Quantity is form-controlled input, so the credit
                        // must not be allowed to wrap the stored stock.
                        Ok(stock) => match stock.checked_add(line.quantity) {
                            Some(new_stock) => {
                                tx.stage_stock(item_id, new_stock);
                                if !credited.contains(&item_id) {
                                    credited.push(item_id);
                                }
                            }
                            None => unreadable.push(SkippedItem {
                                line_no: *line_no,
                                item_id: Some(item_id),
                                reason: SkipReason::CreditOverflow,
                            }),
                        },
                        Err(field_err) => unreadable.push(SkippedItem {
                            line_no: *line_no,
                            item_id: Some(item_id),
                            reason: SkipReason::RecordMalformed(field_err),
                        }),
                    },
                }
            }

            Ok(())
        });

        // Log read-level skips once, after the retry loop has settled.
        for item in &unreadable {
            error!(
                %order_id,
                line_no = item.line_no,
                item_id = %item.item_id.map(|id| id.to_string()).unwrap_or_default(),
                reason = item.reason.code(),
                "skipping line item"
            );
        }
        skipped.extend(unreadable);

        let outcome = match result {
            Ok(()) if credited.is_empty() => {
                info!(%order_id, skipped = skipped.len(), "transaction committed but nothing was credited");
                RestockOutcome::NothingCredited
            }
            Ok(()) => {
                info!(
                    %order_id,
                    credited = credited.len(),
                    skipped = skipped.len(),
                    "restock committed"
                );
                RestockOutcome::Credited
            }
            Err(store_err) => {
                error!(
                    %order_id,
                    error = %store_err,
                    "restock transaction failed; inventory left unchanged"
                );
                // Nothing became durable; drop the staged view.
                credited.clear();
                RestockOutcome::Failed(store_err)
            }
        };

        RestockReport {
            order_id,
            credited,
            skipped,
            outcome,
        }
    }
}
