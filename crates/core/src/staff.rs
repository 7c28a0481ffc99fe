//! Staff capabilities.
//!
//! Permissions are a closed set of tags. `admin` implies every other capability.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One thing a staff member may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Open orders, assign technicians, change status.
    ManageOrders,
    /// Bill orders.
    Charge,
    /// Record till expenses.
    RecordExpense,
    /// Run the daily closing.
    CloseDaily,
    /// Run the monthly closing.
    CloseMonthly,
    /// Everything.
    Admin,
}

impl Capability {
    /// Returns the string representation of the capability.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ManageOrders => "manage_orders",
            Self::Charge => "charge",
            Self::RecordExpense => "record_expense",
            Self::CloseDaily => "close_daily",
            Self::CloseMonthly => "close_monthly",
            Self::Admin => "admin",
        }
    }

    /// Parses a capability tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "manage_orders" => Some(Self::ManageOrders),
            "charge" => Some(Self::Charge),
            "record_expense" => Some(Self::RecordExpense),
            "close_daily" => Some(Self::CloseDaily),
            "close_monthly" => Some(Self::CloseMonthly),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The capabilities granted to one staff member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    /// Builds a set from capabilities.
    #[must_use]
    pub fn new(caps: impl IntoIterator<Item = Capability>) -> Self {
        Self(caps.into_iter().collect())
    }

    /// Builds a set from stored tags, skipping unknown ones.
    #[must_use]
    pub fn from_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Self {
        Self(tags.into_iter().filter_map(Capability::parse).collect())
    }

    /// True if `cap` is granted directly or through `admin`.
    #[must_use]
    pub fn allows(&self, cap: Capability) -> bool {
        self.0.contains(&Capability::Admin) || self.0.contains(&cap)
    }

    /// Tags in stable order.
    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        self.0.iter().map(Capability::as_str).collect()
    }
}
