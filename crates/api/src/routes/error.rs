//! JSON error envelope.
//!
//! Every failure leaves the API as
//! `{"error": <error_code>, "reason": <reason>, "message": <text>}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use torque_shared::{AppError, ErrorKind};
use tracing::{error, warn};

/// Converts a domain or repository error into an HTTP response, logging it.
pub fn error_response(operation: &'static str, e: impl Into<AppError>) -> Response {
    let e = e.into();

    match e.kind() {
        ErrorKind::Infrastructure => {
            error!(operation, error = %e, "Operation failed");
        }
        kind => {
            warn!(operation, kind = %kind, reason = e.reason(), "Operation rejected");
        }
    }

    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match e.kind() {
        // Store details stay in the log.
        ErrorKind::Infrastructure => "An internal error occurred".to_string(),
        _ => e.message().to_string(),
    };

    (
        status,
        Json(json!({
            "error": e.error_code(),
            "reason": e.reason(),
            "message": message,
        })),
    )
        .into_response()
}

/// Wraps a bare store error from a read-only query.
pub fn db_error(e: DbErr) -> AppError {
    AppError::new(ErrorKind::Infrastructure, "DATABASE_ERROR", e.to_string())
}
