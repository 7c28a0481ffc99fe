//! Core business logic for Torque.
//!
//! This crate contains pure business logic with ZERO web/database dependencies:
//! - Order lifecycle state machine
//! - Billing rules
//! - Cash ledger validation
//! - Daily closing aggregation and the monthly gate
//! - Audit action tags and staff capabilities

pub mod audit;
pub mod billing;
pub mod closing;
pub mod ledger;
pub mod order;
pub mod staff;

pub use audit::AuditAction;
pub use staff::{Capability, CapabilitySet};
