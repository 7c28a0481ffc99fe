//! Daily and monthly closing routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use torque_db::ClosingRepository;
use torque_shared::types::{DailyClosingId, StaffId};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::routes::error::error_response;

/// Creates the closing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/closings/daily/preview", get(preview_daily))
        .route("/closings/daily", post(run_daily))
        .route("/closings/daily/{id}", get(get_daily_closing))
        .route("/closings/monthly/status", get(monthly_status))
        .route("/closings/monthly", post(run_monthly))
}

/// Body of the closing commands.
#[derive(Debug, Deserialize)]
pub struct RunClosingRequest {
    /// Staff member closing the till.
    pub actor_id: Uuid,
}

fn closing_repository(state: &AppState) -> ClosingRepository {
    ClosingRepository::new(
        (*state.db).clone(),
        state.calendar.clone(),
        state.shop.default_cutoff_day,
    )
}

/// GET `/closings/daily/preview` - Totals of the pending movements.
async fn preview_daily(State(state): State<AppState>) -> impl IntoResponse {
    match closing_repository(&state).preview_daily().await {
        Ok(preview) => (StatusCode::OK, Json(json!(preview))).into_response(),
        Err(e) => error_response("preview_daily", e),
    }
}

/// POST `/closings/daily` - Close every pending movement.
async fn run_daily(
    State(state): State<AppState>,
    Json(req): Json<RunClosingRequest>,
) -> impl IntoResponse {
    match closing_repository(&state)
        .run_daily(StaffId::from_uuid(req.actor_id))
        .await
    {
        Ok(closing) => {
            info!(
                closing_id = %closing.id,
                movements = closing.movement_count,
                net = %closing.net,
                "Daily closing completed"
            );
            (
                StatusCode::CREATED,
                Json(json!({ "closing_id": closing.id, "closing": closing })),
            )
                .into_response()
        }
        Err(e) => error_response("run_daily_closing", e),
    }
}

/// GET `/closings/daily/{id}` - A daily closing and its movements.
async fn get_daily_closing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match closing_repository(&state)
        .get_daily_closing(DailyClosingId::from_uuid(id))
        .await
    {
        Ok(detail) => (StatusCode::OK, Json(json!(detail))).into_response(),
        Err(e) => error_response("get_daily_closing", e),
    }
}

/// GET `/closings/monthly/status` - Monthly gate for the current month.
async fn monthly_status(State(state): State<AppState>) -> impl IntoResponse {
    match closing_repository(&state).monthly_status().await {
        Ok(status) => (StatusCode::OK, Json(json!(status))).into_response(),
        Err(e) => error_response("monthly_status", e),
    }
}

/// POST `/closings/monthly` - Close the current month.
async fn run_monthly(
    State(state): State<AppState>,
    Json(req): Json<RunClosingRequest>,
) -> impl IntoResponse {
    match closing_repository(&state)
        .run_monthly(StaffId::from_uuid(req.actor_id))
        .await
    {
        Ok(outcome) => {
            info!(
                month = outcome.monthly_closing.month,
                year = outcome.monthly_closing.year,
                "Monthly closing completed"
            );
            (StatusCode::CREATED, Json(json!(outcome))).into_response()
        }
        Err(e) => error_response("run_monthly_closing", e),
    }
}
