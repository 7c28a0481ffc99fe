//! Ledger domain types.
//!
//! A cash movement is either money coming into a till (`Income`, produced by
//! billing) or going out of it (`Expense`, recorded by staff).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Money received.
    Income,
    /// Money paid out.
    Expense,
}

impl MovementDirection {
    /// Returns the string representation of the direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a direction from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "ingreso" => Some(Self::Income),
            "expense" | "egreso" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The till a movement goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash drawer.
    Cash,
    /// Card terminal.
    Card,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    /// All methods.
    pub const ALL: [Self; 3] = [Self::Cash, Self::Card, Self::Transfer];

    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Transfer => "transfer",
        }
    }

    /// Parses a method from a string, accepting the shop's Spanish labels.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "efectivo" => Some(Self::Cash),
            "card" | "tarjeta" => Some(Self::Card),
            "transfer" | "transferencia" => Some(Self::Transfer),
            _ => None,
        }
    }

    /// Card vouchers and transfer receipts must be traceable.
    #[must_use]
    pub const fn requires_reference(&self) -> bool {
        matches!(self, Self::Card | Self::Transfer)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The part of a persisted movement that closing aggregation looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementLine {
    /// Income or expense.
    pub direction: MovementDirection,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Till.
    pub method: PaymentMethod,
}

impl MovementLine {
    /// Creates a new movement line.
    #[must_use]
    pub const fn new(direction: MovementDirection, amount: Decimal, method: PaymentMethod) -> Self {
        Self {
            direction,
            amount,
            method,
        }
    }
}

/// Expense input as submitted by staff.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseRequest {
    /// Amount paid out.
    pub amount: Decimal,
    /// Till it came out of.
    pub method: PaymentMethod,
    /// What it was for.
    pub description: String,
    /// Receipt or voucher number.
    pub reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_parse_aliases() {
        assert_eq!(PaymentMethod::parse("Efectivo"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::parse("TARJETA"), Some(PaymentMethod::Card));
        assert_eq!(
            PaymentMethod::parse("transferencia"),
            Some(PaymentMethod::Transfer)
        );
        assert_eq!(PaymentMethod::parse("cheque"), None);
        for method in PaymentMethod::ALL {
            assert_eq!(PaymentMethod::parse(method.as_str()), Some(method));
        }
    }

    #[test]
    fn test_requires_reference() {
        assert!(!PaymentMethod::Cash.requires_reference());
        assert!(PaymentMethod::Card.requires_reference());
        assert!(PaymentMethod::Transfer.requires_reference());
    }

    #[test]
    fn test_direction_round_trip() {
        assert_eq!(MovementDirection::parse("income"), Some(MovementDirection::Income));
        assert_eq!(MovementDirection::parse("EXPENSE"), Some(MovementDirection::Expense));
        assert_eq!(MovementDirection::Expense.to_string(), "expense");
    }
}
