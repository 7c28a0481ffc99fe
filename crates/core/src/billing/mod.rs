//! Order billing rules.
//!
//! Charging an order is the one hard idempotency guarantee of the shop: an
//! order is billed at most once. The checks here are pure; `torque-db` repeats
//! the status check as a conditional write so concurrent callers cannot both win.

pub mod error;
pub mod service;
pub mod types;

pub use error::BillingError;
pub use service::BillingService;
pub use types::{ChargeAction, ChargeRequest};
