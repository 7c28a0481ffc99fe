//! Money amounts with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! The shop works in a single currency, so an amount is a `Decimal` with at most
//! two fractional digits.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits the ledger keeps.
pub const MONEY_SCALE: u32 = 2;

/// Reasons an amount is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amount is zero or negative where a positive amount is required.
    #[error("amount must be greater than zero")]
    NotPositive,
    /// Amount carries more fractional digits than the ledger keeps.
    #[error("amount has more than {MONEY_SCALE} decimal places")]
    TooPrecise,
}

/// A strictly positive monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Validates a positive amount.
    pub fn positive(amount: Decimal) -> Result<Self, MoneyError> {
        if amount <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }
        if amount.normalize().scale() > MONEY_SCALE {
            return Err(MoneyError::TooPrecise);
        }
        Ok(Self(amount))
    }

    /// The inner decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::positive(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_amount_accepted() {
        let money = Money::positive(dec!(1500)).unwrap();
        assert_eq!(money.amount(), dec!(1500));
        assert_eq!(money.to_string(), "1500.00");
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        assert!(Money::positive(dec!(10.500)).is_ok());
        assert_eq!(Money::positive(dec!(10.505)), Err(MoneyError::TooPrecise));
    }

    #[test]
    fn test_zero_and_negative_rejected() {
        assert_eq!(Money::positive(dec!(0)), Err(MoneyError::NotPositive));
        assert_eq!(Money::positive(dec!(-1)), Err(MoneyError::NotPositive));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Money = serde_json::from_str("\"800.50\"").unwrap();
        assert_eq!(ok.amount(), dec!(800.50));
        assert!(serde_json::from_str::<Money>("\"-3\"").is_err());
    }
}
