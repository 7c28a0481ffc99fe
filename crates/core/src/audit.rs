//! Audit trail action tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a committed operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Order opened at intake.
    OrderCreated,
    /// Technician set or cleared.
    TechnicianAssigned,
    /// Operator-driven status change.
    OrderStatusChanged,
    /// Order billed and delivered.
    OrderCharged,
    /// Expense appended to the ledger.
    ExpenseRecorded,
    /// Pending movements frozen into a daily closing.
    DailyClosing,
    /// Period marked closed.
    MonthlyClosing,
}

impl AuditAction {
    /// Returns the persisted tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "ORDER_CREATED",
            Self::TechnicianAssigned => "TECHNICIAN_ASSIGNED",
            Self::OrderStatusChanged => "ORDER_STATUS_CHANGED",
            Self::OrderCharged => "ORDER_CHARGED",
            Self::ExpenseRecorded => "EXPENSE_RECORDED",
            Self::DailyClosing => "DAILY_CLOSING",
            Self::MonthlyClosing => "MONTHLY_CLOSING",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_serde() {
        let tag = serde_json::to_string(&AuditAction::OrderCharged).unwrap();
        assert_eq!(tag, "\"ORDER_CHARGED\"");
        assert_eq!(AuditAction::DailyClosing.to_string(), "DAILY_CLOSING");
    }
}
