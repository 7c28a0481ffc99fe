//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for orders, billing, the cash ledger and closings
//! - The JSON error envelope shared by every handler

pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use torque_shared::{ShopCalendar, ShopConfig};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Shop-local clock.
    pub calendar: ShopCalendar,
    /// Shop business defaults.
    pub shop: Arc<ShopConfig>,
}

impl AppState {
    /// Builds the state from its parts.
    #[must_use]
    pub fn new(db: DatabaseConnection, calendar: ShopCalendar, shop: ShopConfig) -> Self {
        Self {
            db: Arc::new(db),
            calendar,
            shop: Arc::new(shop),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
