//! Billing service.

use chrono::{DateTime, Utc};

use crate::billing::error::BillingError;
use crate::billing::types::{ChargeAction, ChargeRequest};
use crate::ledger::LedgerService;
use crate::order::OrderStatus;

/// Billing service - stateless charge validation.
pub struct BillingService;

impl BillingService {
    /// Checks that an order in `status` may be charged.
    ///
    /// # Errors
    ///
    /// - `AlreadyBilled` if the order is delivered.
    /// - `OrderCancelled` if the order is cancelled.
    pub const fn ensure_billable(status: OrderStatus) -> Result<(), BillingError> {
        match status {
            OrderStatus::Delivered => Err(BillingError::AlreadyBilled),
            OrderStatus::Cancelled => Err(BillingError::OrderCancelled),
            _ => Ok(()),
        }
    }

    /// Validates a charge against the order's current status.
    ///
    /// The status guard runs first, so a repeated charge reports
    /// `AlreadyBilled` even when its amount is also bad.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::ensure_billable`], then amount and reference errors.
    pub fn charge(
        status: OrderStatus,
        folio: &str,
        request: &ChargeRequest,
        at: DateTime<Utc>,
    ) -> Result<ChargeAction, BillingError> {
        Self::ensure_billable(status)?;

        let amount = LedgerService::validate_amount(request.amount)?;
        let reference =
            LedgerService::validate_reference(request.method, request.reference.as_deref())?;

        let summary = match &reference {
            Some(r) => format!("Charged {amount} via {} (ref {r}) for order {folio}", request.method),
            None => format!("Charged {amount} via {} for order {folio}", request.method),
        };

        Ok(ChargeAction {
            amount,
            method: request.method,
            reference,
            closed_at: at,
            summary,
        })
    }
}
