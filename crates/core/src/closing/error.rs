//! Closing error types.

use thiserror::Error;
use torque_shared::{AppError, ErrorKind};

use crate::closing::monthly::GateReason;

/// Errors raised by the closing protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClosingError {
    /// No movement is waiting to be closed.
    #[error("There are no pending movements to close")]
    NothingToClose,

    /// The monthly gate is not open.
    #[error("{}", .0.message())]
    NotAvailable(GateReason),
}

impl ClosingError {
    /// Taxonomy bucket.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::GuardViolation
    }

    /// Stable reason code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NothingToClose => "NOTHING_TO_CLOSE",
            Self::NotAvailable(reason) => reason.as_str(),
        }
    }
}

impl From<ClosingError> for AppError {
    fn from(e: ClosingError) -> Self {
        Self::new(e.kind(), e.reason(), e.to_string())
    }
}
