//! Monthly closing gate.
//!
//! The gate is evaluated on demand from a handful of facts gathered by the
//! persistence layer. Evaluation order: an existing closing for the period wins,
//! then the cutoff day, then the presence of a daily closing for today.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use torque_shared::clock::last_day_of_month;

use crate::closing::error::ClosingError;

/// Cutoff day used when nothing valid is configured.
pub const DEFAULT_CUTOFF_DAY: u32 = 28;

/// Tri-state readiness of the monthly closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    /// Preconditions not met yet.
    Blocked,
    /// The closing may run now.
    Available,
    /// The period is already closed.
    Closed,
}

impl GateState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Blocked => "BLOCKED",
            Self::Available => "AVAILABLE",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why the gate is in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateReason {
    /// A monthly closing exists for the period.
    AlreadyClosed,
    /// Today is before the cutoff day.
    BeforeCutoff,
    /// No daily closing was run today.
    MissingDailyClosing,
    /// Every precondition holds.
    Ready,
}

impl GateReason {
    /// Returns the stable reason code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyClosed => "ALREADY_CLOSED",
            Self::BeforeCutoff => "BEFORE_CUTOFF",
            Self::MissingDailyClosing => "MISSING_DAILY_CLOSING",
            Self::Ready => "READY",
        }
    }

    /// Human-readable explanation.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::AlreadyClosed => "The monthly closing for this period has already been done",
            Self::BeforeCutoff => "The monthly closing is not available before the cutoff day",
            Self::MissingDailyClosing => "Run today's daily closing before the monthly closing",
            Self::Ready => "The monthly closing is available",
        }
    }
}

/// Inputs of the gate, read inside the caller's transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateFacts {
    /// Shop-local date.
    pub today: NaiveDate,
    /// Configured cutoff day.
    pub cutoff_day: u32,
    /// A monthly closing exists for today's (month, year).
    pub already_closed: bool,
    /// A daily closing exists whose business date is today.
    pub daily_closing_today: bool,
}

/// Gate outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateStatus {
    /// Tri-state.
    pub state: GateState,
    /// Reason code.
    pub reason: GateReason,
}

impl GateStatus {
    /// True when the closing may run.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state == GateState::Available
    }
}

/// Monthly gate - stateless evaluation.
pub struct MonthlyGate;

impl MonthlyGate {
    /// Evaluates the gate.
    #[must_use]
    pub fn evaluate(facts: &GateFacts) -> GateStatus {
        if facts.already_closed {
            return GateStatus {
                state: GateState::Closed,
                reason: GateReason::AlreadyClosed,
            };
        }

        let cutoff = Self::effective_cutoff(facts.cutoff_day, facts.today);
        if facts.today.day() < cutoff {
            return GateStatus {
                state: GateState::Blocked,
                reason: GateReason::BeforeCutoff,
            };
        }

        if !facts.daily_closing_today {
            return GateStatus {
                state: GateState::Blocked,
                reason: GateReason::MissingDailyClosing,
            };
        }

        GateStatus {
            state: GateState::Available,
            reason: GateReason::Ready,
        }
    }

    /// Requires the gate to be available.
    ///
    /// # Errors
    ///
    /// Returns `NotAvailable` with the gate's reason otherwise.
    pub fn ensure_available(facts: &GateFacts) -> Result<GateStatus, ClosingError> {
        let status = Self::evaluate(facts);
        if status.is_available() {
            Ok(status)
        } else {
            Err(ClosingError::NotAvailable(status.reason))
        }
    }

    /// Cutoff day clamped to the length of `today`'s month.
    #[must_use]
    pub fn effective_cutoff(cutoff_day: u32, today: NaiveDate) -> u32 {
        let last = last_day_of_month(today.year(), today.month()).day();
        cutoff_day.clamp(1, last)
    }

    /// Audit detail and response message for a committed closing.
    #[must_use]
    pub fn summary(month: u32, year: i32) -> String {
        format!("Monthly closing for {month:02}/{year} completed")
    }
}

/// A cutoff day read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffDay {
    /// Day of month, 1..=31.
    pub day: u32,
    /// The stored value was present but unusable; `day` is the fallback.
    pub malformed: bool,
}

impl CutoffDay {
    /// Parses a stored setting, falling back to `default` when absent or invalid.
    #[must_use]
    pub fn from_setting(raw: Option<&str>, default: u32) -> Self {
        let default = if (1..=31).contains(&default) {
            default
        } else {
            DEFAULT_CUTOFF_DAY
        };

        let Some(raw) = raw else {
            return Self {
                day: default,
                malformed: false,
            };
        };

        match raw.trim().parse::<u32>() {
            Ok(day) if (1..=31).contains(&day) => Self {
                day,
                malformed: false,
            },
            _ => Self {
                day: default,
                malformed: true,
            },
        }
    }
}
