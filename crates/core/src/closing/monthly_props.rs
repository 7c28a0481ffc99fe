//! Property-based tests for the monthly gate.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use crate::closing::monthly::{GateFacts, GateReason, GateState, MonthlyGate};

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2035, 1u32..=12, 1u32..=31).prop_filter_map("valid date", |(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Before the cutoff the gate is never available.
    #[test]
    fn prop_blocked_before_cutoff(
        today in arb_date(),
        cutoff_day in 1u32..=31,
        daily_closing_today in any::<bool>(),
    ) {
        let facts = GateFacts { today, cutoff_day, already_closed: false, daily_closing_today };
        let status = MonthlyGate::evaluate(&facts);

        if today.day() < MonthlyGate::effective_cutoff(cutoff_day, today) {
            prop_assert_eq!(status.state, GateState::Blocked);
            prop_assert_eq!(status.reason, GateReason::BeforeCutoff);
        }
    }

    /// Available exactly when cutoff reached, a daily closing exists and the period is open.
    #[test]
    fn prop_available_iff_all_preconditions(
        today in arb_date(),
        cutoff_day in 1u32..=31,
        already_closed in any::<bool>(),
        daily_closing_today in any::<bool>(),
    ) {
        let facts = GateFacts { today, cutoff_day, already_closed, daily_closing_today };
        let expected = !already_closed
            && daily_closing_today
            && today.day() >= MonthlyGate::effective_cutoff(cutoff_day, today);

        prop_assert_eq!(MonthlyGate::evaluate(&facts).is_available(), expected);
    }

    /// The last day of any month satisfies any cutoff.
    #[test]
    fn prop_last_day_reaches_any_cutoff(today in arb_date(), cutoff_day in 1u32..=31) {
        let last = torque_shared::clock::last_day_of_month(today.year(), today.month());
        let facts = GateFacts {
            today: last,
            cutoff_day,
            already_closed: false,
            daily_closing_today: true,
        };
        prop_assert!(MonthlyGate::evaluate(&facts).is_available());
    }

    /// An existing closing always reports CLOSED.
    #[test]
    fn prop_closed_is_terminal(
        today in arb_date(),
        cutoff_day in 1u32..=31,
        daily_closing_today in any::<bool>(),
    ) {
        let facts = GateFacts { today, cutoff_day, already_closed: true, daily_closing_today };
        prop_assert_eq!(MonthlyGate::evaluate(&facts).state, GateState::Closed);
    }
}
