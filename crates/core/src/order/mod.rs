//! Work-order lifecycle.
//!
//! This module implements the order status state machine and its guards.
//!
//! # Modules
//!
//! - `types` - Order status and intake types
//! - `error` - Order-specific error types
//! - `service` - Transition logic and intake validation

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::OrderError;
pub use service::{OrderLifecycle, format_folio, has_technician, normalize_technician};
pub use types::{IntakeRequest, OrderStatus};
