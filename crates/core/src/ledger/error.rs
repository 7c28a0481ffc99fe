//! Ledger error types.

use thiserror::Error;
use torque_shared::types::MoneyError;
use torque_shared::{AppError, ErrorKind};

use crate::ledger::types::PaymentMethod;

/// Errors raised while validating cash movements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount is not a positive two-decimal value.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] MoneyError),

    /// Card and transfer movements need a voucher or receipt number.
    #[error("A reference is required for {0} payments")]
    ReferenceRequired(PaymentMethod),

    /// Expenses must say what they were for.
    #[error("Expense description cannot be empty")]
    EmptyDescription,
}

impl LedgerError {
    /// Taxonomy bucket; every ledger error is a validation failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    /// Stable reason code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidAmount(MoneyError::NotPositive) => "AMOUNT_NOT_POSITIVE",
            Self::InvalidAmount(MoneyError::TooPrecise) => "AMOUNT_TOO_PRECISE",
            Self::ReferenceRequired(_) => "REFERENCE_REQUIRED",
            Self::EmptyDescription => "DESCRIPTION_REQUIRED",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        Self::new(e.kind(), e.reason(), e.to_string())
    }
}
