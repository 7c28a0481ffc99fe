//! Application-wide error types.
//!
//! Every domain and repository error in the workspace classifies itself into one
//! [`ErrorKind`]. The API layer only ever looks at the kind, the stable reason code
//! and the message, so new domain errors never need new HTTP plumbing.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// The error taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Referenced entity is absent.
    NotFound,
    /// Malformed input (non-positive amount, unknown status, ...).
    Validation,
    /// A business precondition failed (missing technician, already billed, gate closed).
    GuardViolation,
    /// The actor lacks the capability for the operation.
    Forbidden,
    /// Concurrent-write contention was detected; the whole operation may be retried.
    Conflict,
    /// The store or another infrastructure dependency failed.
    Infrastructure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::GuardViolation => "guard_violation",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
            Self::Infrastructure => "infrastructure",
        };
        f.write_str(s)
    }
}

/// Application error types.
///
/// `reason` is a stable machine code for the specific rule that failed
/// (`ALREADY_BILLED`, `NOTHING_TO_CLOSE`, ...).
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Specific reason code.
        reason: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Validation error.
    #[error("Validation error: {message}")]
    Validation {
        /// Specific reason code.
        reason: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Business rule precondition failed.
    #[error("Guard violation: {message}")]
    GuardViolation {
        /// Specific reason code.
        reason: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Access denied.
    #[error("Access denied: {message}")]
    Forbidden {
        /// Specific reason code.
        reason: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Concurrent modification detected.
    #[error("Conflict: {message}")]
    Conflict {
        /// Specific reason code.
        reason: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Store unreachable or failing.
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Specific reason code.
        reason: &'static str,
        /// Human-readable message.
        message: String,
    },
}

impl AppError {
    /// Builds an error of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, reason: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::NotFound => Self::NotFound { reason, message },
            ErrorKind::Validation => Self::Validation { reason, message },
            ErrorKind::GuardViolation => Self::GuardViolation { reason, message },
            ErrorKind::Forbidden => Self::Forbidden { reason, message },
            ErrorKind::Conflict => Self::Conflict { reason, message },
            ErrorKind::Infrastructure => Self::Infrastructure { reason, message },
        }
    }

    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::GuardViolation { .. } => ErrorKind::GuardViolation,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Infrastructure { .. } => ErrorKind::Infrastructure,
        }
    }

    /// Returns the specific reason code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NotFound { reason, .. }
            | Self::Validation { reason, .. }
            | Self::GuardViolation { reason, .. }
            | Self::Forbidden { reason, .. }
            | Self::Conflict { reason, .. }
            | Self::Infrastructure { reason, .. } => reason,
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message, .. }
            | Self::Validation { message, .. }
            | Self::GuardViolation { message, .. }
            | Self::Forbidden { message, .. }
            | Self::Conflict { message, .. }
            | Self::Infrastructure { message, .. } => message,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation { .. } | Self::GuardViolation { .. } => 400,
            Self::Forbidden { .. } => 403,
            Self::Conflict { .. } => 409,
            Self::Infrastructure { .. } => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::GuardViolation { .. } => "GUARD_VIOLATION",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Conflict { .. } => "CONFLICT",
            Self::Infrastructure { .. } => "INFRASTRUCTURE_ERROR",
        }
    }
}
