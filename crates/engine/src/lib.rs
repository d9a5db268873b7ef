//! Order-cancellation inventory reconciliation engine.
//!
//! Observes order mutations, detects the edge "order became Cancelled", and
//! credits reserved stock back to inventory in one atomic transaction with
//! per-item fault isolation.
//!
//! Control flow: [`MutationDispatcher`] receives `(order_id, previous, new)`
//! snapshots, asks the transition detector for a verdict, and on a
//! cancellation edge runs the [`RestockExecutor`] against the injected
//! [`restock_store::InventoryStore`]. All failures terminate inside the
//! dispatcher as logged outcomes; nothing is raised back to the
//! notification system (a raised error would be reinterpreted as
//! "redeliver this event").
//!
//! Known residual risk: delivery is at-least-once and this engine keeps no
//! durable marker that a cancellation edge was already credited, so a
//! redelivered edge can credit twice. See `DESIGN.md`.

pub mod detector;
pub mod dispatcher;
pub mod executor;
pub mod report;


pub use detector::{RestockDecision, assess, should_restock};
pub use dispatcher::{DispatchOutcome, MutationDispatcher};
pub use executor::RestockExecutor;
pub use report::{RestockOutcome, RestockReport, SkipReason, SkippedItem};
