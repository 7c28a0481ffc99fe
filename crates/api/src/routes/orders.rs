//! Order routes: intake, technician, status transitions and billing.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use torque_core::billing::ChargeRequest;
use torque_core::ledger::PaymentMethod;
use torque_core::order::IntakeRequest;
use torque_db::{BillingRepository, OrderRepository};
use torque_shared::types::{OrderId, StaffId};
use torque_shared::{AppError, ErrorKind};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::routes::error::error_response;

/// Creates the order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(open_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/technician", put(assign_technician))
        .route("/orders/{id}/status", put(transition_order))
        .route("/orders/{id}/charge", post(charge_order))
}

/// Request body for opening an order.
#[derive(Debug, Deserialize)]
pub struct OpenOrderRequest {
    /// Staff member performing the intake.
    pub actor_id: Uuid,
    /// Customer reference.
    pub client_id: Option<i64>,
    /// Vehicle reference.
    pub vehicle_id: Option<i64>,
    /// Odometer reading.
    #[serde(default)]
    pub odometer_km: i32,
    /// Fuel gauge, 0-100.
    #[serde(default)]
    pub fuel_level: i16,
    /// Technician assigned at intake.
    pub technician: Option<String>,
}

/// Request body for assigning a technician.
#[derive(Debug, Deserialize)]
pub struct AssignTechnicianRequest {
    /// Staff member making the change.
    pub actor_id: Uuid,
    /// Technician name; null or blank clears it.
    pub technician: Option<String>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Staff member making the change.
    pub actor_id: Uuid,
    /// Target status.
    pub status: String,
}

/// Request body for charging an order.
#[derive(Debug, Deserialize)]
pub struct ChargeOrderRequest {
    /// Cashier.
    pub actor_id: Uuid,
    /// Amount charged.
    pub amount: Decimal,
    /// `cash`, `card` or `transfer` (Spanish labels accepted).
    pub method: String,
    /// Voucher or receipt number.
    pub reference: Option<String>,
}

/// Parses a payment method label.
pub(crate) fn parse_method(raw: &str) -> Result<PaymentMethod, AppError> {
    PaymentMethod::parse(raw).ok_or_else(|| {
        AppError::new(
            ErrorKind::Validation,
            "INVALID_PAYMENT_METHOD",
            format!("'{raw}' is not a valid payment method"),
        )
    })
}

fn order_repository(state: &AppState) -> OrderRepository {
    OrderRepository::new(
        (*state.db).clone(),
        state.calendar.clone(),
        state.shop.folio_prefix.clone(),
    )
}

/// POST `/orders` - Open a work order.
async fn open_order(
    State(state): State<AppState>,
    Json(req): Json<OpenOrderRequest>,
) -> impl IntoResponse {
    let intake = IntakeRequest {
        client_id: req.client_id,
        vehicle_id: req.vehicle_id,
        odometer_km: req.odometer_km,
        fuel_level: req.fuel_level,
        technician: req.technician,
    };

    match order_repository(&state)
        .open_order(intake, StaffId::from_uuid(req.actor_id))
        .await
    {
        Ok(order) => {
            info!(order_id = order.id, folio = ?order.folio, "Order opened");
            (StatusCode::CREATED, Json(json!(order))).into_response()
        }
        Err(e) => error_response("open_order", e),
    }
}

/// GET `/orders/{id}` - Order snapshot.
async fn get_order(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match order_repository(&state).get(OrderId(id)).await {
        Ok(order) => (StatusCode::OK, Json(json!(order))).into_response(),
        Err(e) => error_response("get_order", e),
    }
}

/// PUT `/orders/{id}/technician` - Set or clear the technician.
async fn assign_technician(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<AssignTechnicianRequest>,
) -> impl IntoResponse {
    match order_repository(&state)
        .assign_technician(
            OrderId(id),
            req.technician.as_deref(),
            StaffId::from_uuid(req.actor_id),
        )
        .await
    {
        Ok(order) => {
            info!(order_id = id, technician = ?order.technician, "Technician assigned");
            (StatusCode::OK, Json(json!(order))).into_response()
        }
        Err(e) => error_response("assign_technician", e),
    }
}

/// PUT `/orders/{id}/status` - Operator-driven status change.
async fn transition_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<TransitionRequest>,
) -> impl IntoResponse {
    match order_repository(&state)
        .transition(OrderId(id), &req.status, StaffId::from_uuid(req.actor_id))
        .await
    {
        Ok(order) => {
            info!(order_id = id, status = ?order.status, "Order status changed");
            (
                StatusCode::OK,
                Json(json!({ "status": order.status, "order": order })),
            )
                .into_response()
        }
        Err(e) => error_response("transition_order", e),
    }
}

/// POST `/orders/{id}/charge` - Bill and deliver an order.
async fn charge_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<ChargeOrderRequest>,
) -> impl IntoResponse {
    let method = match parse_method(&req.method) {
        Ok(method) => method,
        Err(e) => return error_response("charge_order", e),
    };

    let repo = BillingRepository::new((*state.db).clone(), state.calendar.clone());
    let request = ChargeRequest {
        amount: req.amount,
        method,
        reference: req.reference,
    };

    match repo
        .charge(OrderId(id), request, StaffId::from_uuid(req.actor_id))
        .await
    {
        Ok(order) => {
            info!(
                order_id = id,
                amount = %req.amount,
                method = %method,
                "Order charged"
            );
            (StatusCode::OK, Json(json!(order))).into_response()
        }
        Err(e) => error_response("charge_order", e),
    }
}
