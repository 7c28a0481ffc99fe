//! Cash ledger rules.
//!
//! This module implements the cash-movement side of the shop:
//! - Movement direction and payment method types
//! - Expense and reference validation
//! - Error types for ledger operations

pub mod error;
pub mod service;
pub mod types;

pub use error::LedgerError;
pub use service::{LedgerService, ValidatedExpense};
pub use types::{ExpenseRequest, MovementDirection, MovementLine, PaymentMethod};
