//! Daily and monthly closings.
//!
//! - `daily` - Aggregation of pending movements into a closing snapshot
//! - `monthly` - The three-state monthly gate and cutoff-day handling
//! - `error` - Closing error types

pub mod daily;
pub mod error;
pub mod monthly;

#[cfg(test)]
mod daily_props;
#[cfg(test)]
mod monthly_props;

pub use daily::{DailyClosingService, DailyTotals};
pub use error::ClosingError;
pub use monthly::{CutoffDay, GateFacts, GateReason, GateState, GateStatus, MonthlyGate};
