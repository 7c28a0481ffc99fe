//! Property-based tests for daily closing aggregation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::closing::daily::DailyTotals;
use crate::ledger::{MovementDirection, MovementLine, PaymentMethod};

/// Amounts in cents, 0.01 to 99,999.99.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_line() -> impl Strategy<Value = MovementLine> {
    (
        prop::sample::select(vec![MovementDirection::Income, MovementDirection::Expense]),
        arb_amount(),
        prop::sample::select(PaymentMethod::ALL.to_vec()),
    )
        .prop_map(|(direction, amount, method)| MovementLine::new(direction, amount, method))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Totals do not depend on the order of the movements.
    #[test]
    fn prop_aggregate_is_order_independent(
        lines in prop::collection::vec(arb_line(), 0..40),
        seed in any::<u64>(),
    ) {
        let forward = DailyTotals::aggregate(&lines);

        let mut reversed = lines.clone();
        reversed.reverse();
        prop_assert_eq!(DailyTotals::aggregate(&reversed), forward);

        let mut rotated = lines.clone();
        if !rotated.is_empty() {
            let len = rotated.len();
            rotated.rotate_left(usize::try_from(seed % len as u64).unwrap_or(0));
        }
        prop_assert_eq!(DailyTotals::aggregate(&rotated), forward);
    }

    /// net == income - expenses, and income is the sum of the per-till totals.
    #[test]
    fn prop_net_identity(lines in prop::collection::vec(arb_line(), 0..40)) {
        let totals = DailyTotals::aggregate(&lines);

        prop_assert_eq!(totals.net, totals.total_income - totals.total_expenses);
        prop_assert_eq!(totals.total_income, totals.cash + totals.card + totals.transfer);

        let income: Decimal = lines
            .iter()
            .filter(|l| l.direction == MovementDirection::Income)
            .map(|l| l.amount)
            .sum();
        prop_assert_eq!(totals.total_income, income);
        prop_assert_eq!(totals.movement_count, lines.len() as u64);
    }

    /// Aggregating two disjoint partitions and adding equals aggregating the whole.
    #[test]
    fn prop_partitions_add_up(
        lines in prop::collection::vec(arb_line(), 0..40),
        split in any::<prop::sample::Index>(),
    ) {
        let at = if lines.is_empty() { 0 } else { split.index(lines.len() + 1) };
        let (first, second) = lines.split_at(at);
        let a = DailyTotals::aggregate(first);
        let b = DailyTotals::aggregate(second);
        let whole = DailyTotals::aggregate(&lines);

        prop_assert_eq!(a.net + b.net, whole.net);
        prop_assert_eq!(a.movement_count + b.movement_count, whole.movement_count);
    }
}
