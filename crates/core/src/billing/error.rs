//! Billing error types.

use thiserror::Error;
use torque_shared::{AppError, ErrorKind};

use crate::ledger::LedgerError;

/// Errors raised by billing rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    /// The order was already charged and delivered.
    #[error("Order has already been billed")]
    AlreadyBilled,

    /// Cancelled orders are never charged.
    #[error("Order is cancelled and cannot be billed")]
    OrderCancelled,

    /// Amount or reference failed validation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl BillingError {
    /// Taxonomy bucket.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyBilled | Self::OrderCancelled => ErrorKind::GuardViolation,
            Self::Ledger(e) => e.kind(),
        }
    }

    /// Stable reason code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::AlreadyBilled => "ALREADY_BILLED",
            Self::OrderCancelled => "ORDER_CANCELLED",
            Self::Ledger(e) => e.reason(),
        }
    }
}

impl From<BillingError> for AppError {
    fn from(e: BillingError) -> Self {
        Self::new(e.kind(), e.reason(), e.to_string())
    }
}
