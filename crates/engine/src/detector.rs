//! Transition detection over order snapshot pairs.
//!
//! Pure and deterministic: the same `(previous, current)` pair always yields
//! the same verdict, which matters because the notification system may
//! deliver the same mutation more than once. The before/after comparison is
//! the correctness mechanism here, not delivery order.

use restock_orders::{OrderSnapshot, OrderStatus};

/// Verdict over a single observed order mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestockDecision {
    /// The new snapshot is not cancelled; nothing to do.
    NotCancelled,

    /// The order was already cancelled before this mutation (edit to an
    /// unrelated field); crediting again would double-restock.
    AlreadyCancelled,

    /// A cancellation edge, but the order has no line items.
    NoItems,

    /// A cancellation edge with items to credit.
    Restock,
}

impl RestockDecision {
    pub fn warrants_restock(self) -> bool {
        matches!(self, RestockDecision::Restock)
    }
}

/// Edge test: did this mutation move the order *into* `Cancelled`?
///
/// `previous` may be absent (first-ever snapshot) or carry no readable
/// status; both count as "was not cancelled".
pub fn should_restock(previous: Option<&OrderSnapshot>, current: &OrderSnapshot) -> bool {
    let was_cancelled =
        previous.and_then(|snapshot| snapshot.status) == Some(OrderStatus::Cancelled);
    current.is_cancelled() && !was_cancelled
}

/// Full verdict, distinguishing the empty-order no-op from a real restock.
pub fn assess(previous: Option<&OrderSnapshot>, current: &OrderSnapshot) -> RestockDecision {
    if !current.is_cancelled() {
        return RestockDecision::NotCancelled;
    }
    if previous.and_then(|snapshot| snapshot.status) == Some(OrderStatus::Cancelled) {
        return RestockDecision::AlreadyCancelled;
    }
    if current.items.is_empty() {
        return RestockDecision::NoItems;
    }
    RestockDecision::Restock
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_orders::RawLineItem;

    fn snapshot(status: Option<OrderStatus>, lines: usize) -> OrderSnapshot {
        OrderSnapshot::new(status, vec![RawLineItem::default(); lines])
    }

    #[test]
    fn fires_on_transition_into_cancelled() {
        let prev = snapshot(Some(OrderStatus::Processing), 1);
        let next = snapshot(Some(OrderStatus::Cancelled), 1);
        assert!(should_restock(Some(&prev), &next));
        assert_eq!(assess(Some(&prev), &next), RestockDecision::Restock);
    }

    #[test]
    fn fires_when_previous_snapshot_is_absent() {
        let next = snapshot(Some(OrderStatus::Cancelled), 1);
        assert!(should_restock(None, &next));
    }

    #[test]
    fn fires_when_previous_status_is_unreadable() {
        let prev = snapshot(None, 1);
        let next = snapshot(Some(OrderStatus::Cancelled), 1);
        assert!(should_restock(Some(&prev), &next));
    }

    #[test]
    fn does_not_fire_when_new_status_is_not_cancelled() {
        let prev = snapshot(Some(OrderStatus::Processing), 1);
        for status in [
            None,
            Some(OrderStatus::PendingPayment),
            Some(OrderStatus::Processing),
            Some(OrderStatus::Shipped),
            Some(OrderStatus::Delivered),
            Some(OrderStatus::Refunded),
        ] {
            let next = snapshot(status, 1);
            assert!(!should_restock(Some(&prev), &next));
            assert_eq!(assess(Some(&prev), &next), RestockDecision::NotCancelled);
        }
    }

    #[test]
    fn does_not_fire_on_edit_to_already_cancelled_order() {
        let prev = snapshot(Some(OrderStatus::Cancelled), 1);
        let next = snapshot(Some(OrderStatus::Cancelled), 2);
        assert!(!should_restock(Some(&prev), &next));
        assert_eq!(assess(Some(&prev), &next), RestockDecision::AlreadyCancelled);
    }

    #[test]
    fn empty_item_list_is_a_distinguishable_no_op() {
        let prev = snapshot(Some(OrderStatus::Processing), 0);
        let next = snapshot(Some(OrderStatus::Cancelled), 0);
        // The edge test itself is still true; the verdict refines it.
        assert!(should_restock(Some(&prev), &next));
        assert_eq!(assess(Some(&prev), &next), RestockDecision::NoItems);
    }

    #[test]
    fn verdict_is_deterministic_for_identical_inputs() {
        let prev = snapshot(Some(OrderStatus::Shipped), 1);
        let next = snapshot(Some(OrderStatus::Cancelled), 1);
        assert_eq!(
            should_restock(Some(&prev), &next),
            should_restock(Some(&prev), &next)
        );
        assert_eq!(assess(Some(&prev), &next), assess(Some(&prev), &next));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn any_status() -> impl Strategy<Value = Option<OrderStatus>> {
            prop_oneof![
                Just(None),
                Just(Some(OrderStatus::PendingPayment)),
                Just(Some(OrderStatus::Processing)),
                Just(Some(OrderStatus::Shipped)),
                Just(Some(OrderStatus::Delivered)),
                Just(Some(OrderStatus::Cancelled)),
                Just(Some(OrderStatus::Refunded)),
            ]
        }

        proptest! {
            #[test]
            fn truth_table_holds_for_all_status_pairs(
                prev_status in any_status(),
                next_status in any_status(),
                has_previous in proptest::bool::ANY,
            ) {
                let prev = OrderSnapshot::new(prev_status, vec![]);
                let next = OrderSnapshot::new(next_status, vec![]);
                let previous = has_previous.then_some(&prev);

                let expected = next_status == Some(OrderStatus::Cancelled)
                    && !(has_previous && prev_status == Some(OrderStatus::Cancelled));

                prop_assert_eq!(should_restock(previous, &next), expected);
                // Reapplying the identical pair yields the identical verdict.
                prop_assert_eq!(
                    should_restock(previous, &next),
                    should_restock(previous, &next)
                );
            }
        }
    }
}
