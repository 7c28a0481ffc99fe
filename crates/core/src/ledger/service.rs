//! Ledger validation service.

use rust_decimal::Decimal;
use torque_shared::types::Money;

use crate::ledger::error::LedgerError;
use crate::ledger::types::{ExpenseRequest, PaymentMethod};

/// An expense that passed validation, ready to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedExpense {
    /// Amount paid out.
    pub amount: Money,
    /// Till.
    pub method: PaymentMethod,
    /// Trimmed description.
    pub description: String,
    /// Trimmed reference, `None` when blank.
    pub reference: Option<String>,
}

/// Ledger service - stateless validation of movements before they are appended.
pub struct LedgerService;

impl LedgerService {
    /// Validates an amount for the ledger.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for zero, negative or over-precise amounts.
    pub fn validate_amount(amount: Decimal) -> Result<Money, LedgerError> {
        Ok(Money::positive(amount)?)
    }

    /// Normalises a reference and checks it is present where the method needs one.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceRequired` for card or transfer without a reference.
    pub fn validate_reference(
        method: PaymentMethod,
        reference: Option<&str>,
    ) -> Result<Option<String>, LedgerError> {
        let reference = reference
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(ToString::to_string);

        if reference.is_none() && method.requires_reference() {
            return Err(LedgerError::ReferenceRequired(method));
        }
        Ok(reference)
    }

    /// Validates an expense.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule: amount, description, then reference.
    pub fn validate_expense(request: &ExpenseRequest) -> Result<ValidatedExpense, LedgerError> {
        let amount = Self::validate_amount(request.amount)?;

        let description = request.description.trim();
        if description.is_empty() {
            return Err(LedgerError::EmptyDescription);
        }

        let reference = Self::validate_reference(request.method, request.reference.as_deref())?;

        Ok(ValidatedExpense {
            amount,
            method: request.method,
            description: description.to_string(),
            reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use torque_shared::types::MoneyError;

    fn expense(amount: Decimal, method: PaymentMethod, description: &str) -> ExpenseRequest {
        ExpenseRequest {
            amount,
            method,
            description: description.to_string(),
            reference: None,
        }
    }

    #[test]
    fn test_valid_cash_expense() {
        let validated =
            LedgerService::validate_expense(&expense(dec!(250.50), PaymentMethod::Cash, " Brake pads "))
                .unwrap();
        assert_eq!(validated.amount.amount(), dec!(250.50));
        assert_eq!(validated.description, "Brake pads");
        assert_eq!(validated.reference, None);
    }

    #[test]
    fn test_expense_rejects_zero_amount() {
        let result = LedgerService::validate_expense(&expense(dec!(0), PaymentMethod::Cash, "x"));
        assert_eq!(result, Err(LedgerError::InvalidAmount(MoneyError::NotPositive)));
    }

    #[test]
    fn test_expense_rejects_blank_description() {
        let result = LedgerService::validate_expense(&expense(dec!(10), PaymentMethod::Cash, "  "));
        assert_eq!(result, Err(LedgerError::EmptyDescription));
    }

    #[test]
    fn test_card_expense_needs_reference() {
        let mut request = expense(dec!(10), PaymentMethod::Card, "Oil");
        assert_eq!(
            LedgerService::validate_expense(&request),
            Err(LedgerError::ReferenceRequired(PaymentMethod::Card))
        );

        request.reference = Some("VCH-881".to_string());
        let validated = LedgerService::validate_expense(&request).unwrap();
        assert_eq!(validated.reference.as_deref(), Some("VCH-881"));
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(
            LedgerError::InvalidAmount(MoneyError::TooPrecise).reason(),
            "AMOUNT_TOO_PRECISE"
        );
        assert_eq!(
            LedgerError::ReferenceRequired(PaymentMethod::Transfer).reason(),
            "REFERENCE_REQUIRED"
        );
    }
}
