//! Order lifecycle rules.
//!
//! Pure functions: the persisted wrapper in `torque-db` reads the order, calls
//! into here, and writes the result back inside its own transaction.

use crate::order::error::OrderError;
use crate::order::types::{IntakeRequest, OrderStatus};

/// Maximum fuel gauge reading (percent).
pub const MAX_FUEL_LEVEL: i16 = 100;

/// Order lifecycle service - stateless rules for status changes and intake.
pub struct OrderLifecycle;

impl OrderLifecycle {
    /// Moves `status` to the status named by `target`.
    ///
    /// Parses `target` and delegates to [`Self::transition_to`].
    ///
    /// # Errors
    ///
    /// - `InvalidTarget` if `target` names no known status.
    /// - Any error of [`Self::transition_to`].
    pub fn transition(
        status: &mut OrderStatus,
        technician: Option<&str>,
        target: &str,
    ) -> Result<OrderStatus, OrderError> {
        let target = OrderStatus::parse(target)
            .ok_or_else(|| OrderError::InvalidTarget(target.to_string()))?;
        Self::transition_to(status, technician, target)
    }

    /// Moves `status` to `target` if the target's guard passes.
    ///
    /// Transitions are operator-driven, so there is no fixed order between
    /// non-terminal states. Only the status is touched; recording the change is
    /// the caller's job.
    ///
    /// # Errors
    ///
    /// - `AlreadyTerminal` if `status` is `Delivered` or `Cancelled`.
    /// - `MissingTechnician` if `target` is `Repairing` and no technician is set.
    pub fn transition_to(
        status: &mut OrderStatus,
        technician: Option<&str>,
        target: OrderStatus,
    ) -> Result<OrderStatus, OrderError> {
        Self::ensure_mutable(*status)?;

        if target == OrderStatus::Repairing && !has_technician(technician) {
            return Err(OrderError::MissingTechnician);
        }

        *status = target;
        Ok(target)
    }

    /// Fails if the order can no longer change.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyTerminal` for `Delivered` and `Cancelled`.
    pub fn ensure_mutable(status: OrderStatus) -> Result<(), OrderError> {
        if status.is_terminal() {
            return Err(OrderError::AlreadyTerminal(status));
        }
        Ok(())
    }

    /// Validates the intake snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFuelLevel` or `InvalidOdometer`.
    pub fn validate_intake(request: &IntakeRequest) -> Result<(), OrderError> {
        if request.fuel_level < 0 || request.fuel_level > MAX_FUEL_LEVEL {
            return Err(OrderError::InvalidFuelLevel(request.fuel_level));
        }
        if request.odometer_km < 0 {
            return Err(OrderError::InvalidOdometer(request.odometer_km));
        }
        Ok(())
    }
}

/// True when a technician name is present and not blank.
#[must_use]
pub fn has_technician(technician: Option<&str>) -> bool {
    technician.is_some_and(|t| !t.trim().is_empty())
}

/// Normalises a technician name; blank means unassigned.
#[must_use]
pub fn normalize_technician(technician: Option<&str>) -> Option<String> {
    technician
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
}

/// Human-readable folio, e.g. `OS-2026-000042`.
#[must_use]
pub fn format_folio(prefix: &str, year: i32, id: i32) -> String {
    format!("{prefix}-{year}-{id:06}")
}
