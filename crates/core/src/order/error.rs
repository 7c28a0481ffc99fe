//! Order error types.

use thiserror::Error;
use torque_shared::{AppError, ErrorKind};

use crate::order::types::OrderStatus;

/// Errors raised by the order state machine and intake validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Target is not one of the recognised statuses.
    #[error("'{0}' is not a valid order status")]
    InvalidTarget(String),

    /// Moving to `repairing` requires an assigned technician.
    #[error("A technician must be assigned before the order can move to repairing")]
    MissingTechnician,

    /// The order already reached a terminal status.
    #[error("Order is already {0} and can no longer change status")]
    AlreadyTerminal(OrderStatus),

    /// Fuel level outside 0-100.
    #[error("Fuel level must be between 0 and 100, got {0}")]
    InvalidFuelLevel(i16),

    /// Negative odometer reading.
    #[error("Odometer reading cannot be negative, got {0}")]
    InvalidOdometer(i32),
}

impl OrderError {
    /// Taxonomy bucket.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTarget(_) | Self::InvalidFuelLevel(_) | Self::InvalidOdometer(_) => {
                ErrorKind::Validation
            }
            Self::MissingTechnician | Self::AlreadyTerminal(_) => ErrorKind::GuardViolation,
        }
    }

    /// Stable reason code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidTarget(_) => "INVALID_TARGET",
            Self::MissingTechnician => "MISSING_TECHNICIAN",
            Self::AlreadyTerminal(_) => "ALREADY_TERMINAL",
            Self::InvalidFuelLevel(_) => "INVALID_FUEL_LEVEL",
            Self::InvalidOdometer(_) => "INVALID_ODOMETER",
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        Self::new(e.kind(), e.reason(), e.to_string())
    }
}
