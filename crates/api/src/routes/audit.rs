//! Audit trail routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use torque_db::AuditRepository;

use crate::AppState;
use crate::routes::error::{db_error, error_response};

/// Creates the audit routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/audit", get(list_entries))
}

/// Query parameters for the audit listing.
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    /// Maximum number of entries.
    pub limit: Option<u64>,
}

/// GET `/audit` - Most recent audit entries.
async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> impl IntoResponse {
    match AuditRepository::new((*state.db).clone())
        .list(query.limit)
        .await
    {
        Ok(entries) => (StatusCode::OK, Json(json!({ "entries": entries }))).into_response(),
        Err(e) => error_response("list_audit_entries", db_error(e)),
    }
}
