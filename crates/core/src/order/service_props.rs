//! Property-based tests for the order lifecycle.

use proptest::prelude::*;

use crate::order::error::OrderError;
use crate::order::service::{OrderLifecycle, has_technician};
use crate::order::types::OrderStatus;

fn arb_status() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::ALL.to_vec())
}

fn arb_technician() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("   ".to_string())),
        "[A-Za-z]{1,12}".prop_map(Some),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Repairing is reached only with a technician present at transition time.
    #[test]
    fn prop_repairing_requires_technician(
        start in arb_status(),
        technician in arb_technician(),
    ) {
        let mut status = start;
        let result = OrderLifecycle::transition_to(
            &mut status,
            technician.as_deref(),
            OrderStatus::Repairing,
        );

        if result.is_ok() {
            prop_assert!(has_technician(technician.as_deref()));
            prop_assert_eq!(status, OrderStatus::Repairing);
        } else {
            prop_assert_eq!(status, start);
        }
    }

    /// Terminal states never change.
    #[test]
    fn prop_terminal_states_are_frozen(
        start in prop::sample::select(vec![OrderStatus::Delivered, OrderStatus::Cancelled]),
        target in arb_status(),
        technician in arb_technician(),
    ) {
        let mut status = start;
        let result = OrderLifecycle::transition_to(&mut status, technician.as_deref(), target);
        prop_assert_eq!(result, Err(OrderError::AlreadyTerminal(start)));
        prop_assert_eq!(status, start);
    }

    /// Every non-repairing target is reachable from every non-terminal state.
    #[test]
    fn prop_unguarded_targets_reachable(
        start in arb_status(),
        target in arb_status(),
    ) {
        prop_assume!(!start.is_terminal());
        prop_assume!(target != OrderStatus::Repairing);

        let mut status = start;
        let result = OrderLifecycle::transition_to(&mut status, None, target);
        prop_assert_eq!(result, Ok(target));
        prop_assert_eq!(status, target);
    }

    /// Unknown targets never mutate the status.
    #[test]
    fn prop_invalid_target_leaves_status(start in arb_status(), target in "[0-9]{1,8}") {
        let mut status = start;
        let result = OrderLifecycle::transition(&mut status, Some("Luis"), &target);
        prop_assert_eq!(result, Err(OrderError::InvalidTarget(target.clone())));
        prop_assert_eq!(status, start);
    }
}
