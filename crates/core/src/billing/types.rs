//! Billing types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use torque_shared::types::Money;

use crate::ledger::PaymentMethod;

/// A charge as requested at the counter.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeRequest {
    /// Amount to charge.
    pub amount: Decimal,
    /// Till the money goes into.
    pub method: PaymentMethod,
    /// Voucher or transfer receipt.
    #[serde(default)]
    pub reference: Option<String>,
}

/// Everything the persistence layer has to write for a successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeAction {
    /// Validated amount.
    pub amount: Money,
    /// Till.
    pub method: PaymentMethod,
    /// Normalised reference.
    pub reference: Option<String>,
    /// Order closing timestamp.
    pub closed_at: DateTime<Utc>,
    /// Human-readable audit detail.
    pub summary: String,
}
