//! Cash ledger routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use torque_core::ledger::ExpenseRequest;
use torque_db::LedgerRepository;
use torque_shared::types::StaffId;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::routes::error::{db_error, error_response};
use crate::routes::orders::parse_method;

/// Creates the cash ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cash/expenses", post(record_expense))
        .route("/cash/pending", get(list_pending))
}

/// Request body for recording an expense.
#[derive(Debug, Deserialize)]
pub struct RecordExpenseRequest {
    /// Staff member paying out.
    pub actor_id: Uuid,
    /// Amount paid out.
    pub amount: Decimal,
    /// Till the money left.
    pub method: String,
    /// What it was for.
    #[serde(default)]
    pub description: String,
    /// Receipt number.
    pub reference: Option<String>,
}

/// POST `/cash/expenses` - Record an expense movement.
async fn record_expense(
    State(state): State<AppState>,
    Json(req): Json<RecordExpenseRequest>,
) -> impl IntoResponse {
    let method = match parse_method(&req.method) {
        Ok(method) => method,
        Err(e) => return error_response("record_expense", e),
    };

    let repo = LedgerRepository::new((*state.db).clone(), state.calendar.clone());
    let request = ExpenseRequest {
        amount: req.amount,
        method,
        description: req.description,
        reference: req.reference,
    };

    match repo.record_expense(request, StaffId::from_uuid(req.actor_id)).await {
        Ok(movement) => {
            info!(movement_id = %movement.id, amount = %movement.amount, "Expense recorded");
            (StatusCode::CREATED, Json(json!(movement))).into_response()
        }
        Err(e) => error_response("record_expense", e),
    }
}

/// GET `/cash/pending` - Movements not yet in a daily closing.
async fn list_pending(State(state): State<AppState>) -> impl IntoResponse {
    let repo = LedgerRepository::new((*state.db).clone(), state.calendar.clone());

    match repo.pending().await {
        Ok(movements) => (
            StatusCode::OK,
            Json(json!({ "movements": movements, "count": movements.len() })),
        )
            .into_response(),
        Err(e) => error_response("list_pending", db_error(e)),
    }
}
