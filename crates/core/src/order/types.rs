//! Order domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a work order.
///
/// Intake starts at `Received`. `Delivered` and `Cancelled` are terminal.
/// Transitions are operator-driven: any state may be reached from any
/// non-terminal state as long as the target's own guard passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Vehicle checked in at the intake desk.
    Received,
    /// Technician is diagnosing.
    Diagnosing,
    /// Repair in progress (requires an assigned technician).
    Repairing,
    /// Work done, waiting for the customer to pay.
    Finished,
    /// Charged and handed back to the customer.
    Delivered,
    /// Abandoned before delivery.
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Received,
        Self::Diagnosing,
        Self::Repairing,
        Self::Finished,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Diagnosing => "diagnosing",
            Self::Repairing => "repairing",
            Self::Finished => "finished",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    ///
    /// Case-insensitive; the intake desk's Spanish tags are accepted as aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "received" | "recibido" => Some(Self::Received),
            "diagnosing" | "diagnostico" | "diagnóstico" => Some(Self::Diagnosing),
            "repairing" | "reparacion" | "reparación" => Some(Self::Repairing),
            "finished" | "terminado" => Some(Self::Finished),
            "delivered" | "entregado" => Some(Self::Delivered),
            "cancelled" | "canceled" | "cancelado" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true for `Delivered` and `Cancelled`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Data captured at the intake desk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeRequest {
    /// Customer reference in the CRUD layer.
    pub client_id: Option<i64>,
    /// Vehicle reference in the CRUD layer.
    pub vehicle_id: Option<i64>,
    /// Odometer reading in kilometres.
    pub odometer_km: i32,
    /// Fuel gauge, 0-100 percent.
    pub fuel_level: i16,
    /// Technician assigned at intake, if any.
    pub technician: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_status_as_str() {
        assert_eq!(OrderStatus::Received.as_str(), "received");
        assert_eq!(OrderStatus::Diagnosing.as_str(), "diagnosing");
        assert_eq!(OrderStatus::Repairing.as_str(), "repairing");
        assert_eq!(OrderStatus::Finished.as_str(), "finished");
        assert_eq!(OrderStatus::Delivered.as_str(), "delivered");
        assert_eq!(OrderStatus::Cancelled.as_str(), "cancelled");
    }

    #[rstest]
    #[case("received", OrderStatus::Received)]
    #[case("RECEIVED", OrderStatus::Received)]
    #[case("recibido", OrderStatus::Received)]
    #[case("Diagnostico", OrderStatus::Diagnosing)]
    #[case("reparacion", OrderStatus::Repairing)]
    #[case(" repairing ", OrderStatus::Repairing)]
    #[case("terminado", OrderStatus::Finished)]
    #[case("entregado", OrderStatus::Delivered)]
    #[case("cancelado", OrderStatus::Cancelled)]
    fn test_status_parse(#[case] raw: &str, #[case] expected: OrderStatus) {
        assert_eq!(OrderStatus::parse(raw), Some(expected));
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!(OrderStatus::parse("paid"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn test_status_round_trips_through_as_str() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Received.is_terminal());
        assert!(!OrderStatus::Finished.is_terminal());
    }
}
