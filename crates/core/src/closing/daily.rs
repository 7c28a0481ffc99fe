//! Daily closing aggregation.
//!
//! Totals are a pure sum over the movement set: the same set in any order
//! yields the same totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::closing::error::ClosingError;
use crate::ledger::{MovementDirection, MovementLine, PaymentMethod};

/// Aggregated totals of a set of movements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyTotals {
    /// Cash income.
    pub cash: Decimal,
    /// Card income.
    pub card: Decimal,
    /// Transfer income.
    pub transfer: Decimal,
    /// Sum of all income.
    pub total_income: Decimal,
    /// Sum of all expenses, any till.
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`.
    pub net: Decimal,
    /// Number of movements aggregated.
    pub movement_count: u64,
}

impl DailyTotals {
    /// Aggregates movement lines.
    pub fn aggregate<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a MovementLine>,
    {
        let mut totals = Self::default();

        for line in lines {
            totals.movement_count += 1;
            match line.direction {
                MovementDirection::Income => {
                    match line.method {
                        PaymentMethod::Cash => totals.cash += line.amount,
                        PaymentMethod::Card => totals.card += line.amount,
                        PaymentMethod::Transfer => totals.transfer += line.amount,
                    }
                    totals.total_income += line.amount;
                }
                MovementDirection::Expense => totals.total_expenses += line.amount,
            }
        }

        totals.net = totals.total_income - totals.total_expenses;
        totals
    }

    /// Income for one till.
    #[must_use]
    pub const fn income_for(&self, method: PaymentMethod) -> Decimal {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Card => self.card,
            PaymentMethod::Transfer => self.transfer,
        }
    }

    /// True when nothing was aggregated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.movement_count == 0
    }
}

/// Daily closing service - stateless.
pub struct DailyClosingService;

impl DailyClosingService {
    /// Plans a closing over a snapshot of pending movements.
    ///
    /// # Errors
    ///
    /// Returns `NothingToClose` when the snapshot is empty.
    pub fn plan(snapshot: &[MovementLine]) -> Result<DailyTotals, ClosingError> {
        if snapshot.is_empty() {
            return Err(ClosingError::NothingToClose);
        }
        Ok(DailyTotals::aggregate(snapshot))
    }

    /// Audit detail for a committed closing.
    #[must_use]
    pub fn summary(closing_id: &str, totals: &DailyTotals) -> String {
        format!(
            "Daily closing {closing_id}: {} movements, net {:.2}",
            totals.movement_count, totals.net
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn income(amount: Decimal, method: PaymentMethod) -> MovementLine {
        MovementLine::new(MovementDirection::Income, amount, method)
    }

    fn expense(amount: Decimal) -> MovementLine {
        MovementLine::new(MovementDirection::Expense, amount, PaymentMethod::Cash)
    }

    #[test]
    fn test_preview_two_pending_movements() {
        let lines = [
            income(dec!(800), PaymentMethod::Cash),
            income(dec!(300), PaymentMethod::Card),
        ];
        let totals = DailyTotals::aggregate(&lines);

        assert_eq!(totals.cash, dec!(800));
        assert_eq!(totals.card, dec!(300));
        assert_eq!(totals.transfer, dec!(0));
        assert_eq!(totals.total_income, dec!(1100));
        assert_eq!(totals.total_expenses, dec!(0));
        assert_eq!(totals.net, dec!(1100));
        assert_eq!(totals.movement_count, 2);
    }

    #[test]
    fn test_expenses_reduce_net() {
        let lines = [
            income(dec!(1500), PaymentMethod::Cash),
            income(dec!(200.50), PaymentMethod::Transfer),
            expense(dec!(350.25)),
        ];
        let totals = DailyTotals::aggregate(&lines);

        assert_eq!(totals.total_income, dec!(1700.50));
        assert_eq!(totals.total_expenses, dec!(350.25));
        assert_eq!(totals.net, dec!(1350.25));
        assert_eq!(totals.income_for(PaymentMethod::Transfer), dec!(200.50));
        assert_eq!(totals.movement_count, 3);
    }

    #[test]
    fn test_plan_empty_snapshot() {
        assert_eq!(
            DailyClosingService::plan(&[]),
            Err(ClosingError::NothingToClose)
        );
    }

    #[test]
    fn test_plan_non_empty_snapshot() {
        let totals = DailyClosingService::plan(&[expense(dec!(40))]).unwrap();
        assert_eq!(totals.net, dec!(-40));
        assert!(!totals.is_empty());
    }

    #[test]
    fn test_summary() {
        let totals = DailyTotals::aggregate(&[income(dec!(800), PaymentMethod::Cash)]);
        assert_eq!(
            DailyClosingService::summary("abc", &totals),
            "Daily closing abc: 1 movements, net 800.00"
        );
    }
}
