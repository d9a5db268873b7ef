//! Mutation dispatch: the engine's entry point.

use tracing::{debug, info};

use restock_orders::{OrderId, OrderSnapshot};
use restock_store::InventoryStore;

use crate::detector::{self, RestockDecision};
use crate::executor::RestockExecutor;
use crate::report::RestockReport;

/// Terminal outcome of one observed order mutation.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The mutation was not a cancellation edge; nothing was done.
    Ignored(RestockDecision),

    /// A cancellation edge on an order with no line items; nothing was done
    /// and no store operation was issued.
    NoItems,

    /// A cancellation edge; the executor ran and produced this report.
    Restocked(RestockReport),
}

/// Entry point invoked once per observed order mutation.
///
/// Wires the transition detector into the restock executor and reports the
/// terminal outcome. Fire-and-forget from the caller's perspective: every
/// failure ends here as a logged outcome, because the notification system
/// treats a raised error as "redeliver this event" and the executor has no
/// cross-invocation idempotency to make redelivery safe.
///
/// Invocations are stateless and may run concurrently, including for the
/// same order; the store's transactional isolation is the only
/// synchronization.
pub struct MutationDispatcher<S: InventoryStore> {
    executor: RestockExecutor<S>,
}

impl<S: InventoryStore> MutationDispatcher<S> {
    /// Build a dispatcher over an injected store handle. The store's
    /// lifecycle is owned by the hosting process, not by the engine.
    pub fn new(store: S) -> Self {
        Self {
            executor: RestockExecutor::new(store),
        }
    }

    /// Handle one `(order_id, previous, current)` mutation notification.
    ///
    /// Never returns an error and never panics on malformed input; the
    /// returned outcome is informational.
    pub fn on_order_mutation(
        &self,
        order_id: OrderId,
        previous: Option<&OrderSnapshot>,
        current: &OrderSnapshot,
    ) -> DispatchOutcome {
        match detector::assess(previous, current) {
            decision @ (RestockDecision::NotCancelled | RestockDecision::AlreadyCancelled) => {
                debug!(%order_id, ?decision, "order mutation ignored");
                DispatchOutcome::Ignored(decision)
            }
            RestockDecision::NoItems => {
                info!(%order_id, "cancelled order has no line items; nothing to restock");
                DispatchOutcome::NoItems
            }
            RestockDecision::Restock => {
                let report = self.executor.restock(order_id, &current.items);
                DispatchOutcome::Restocked(report)
            }
        }
    }
}
