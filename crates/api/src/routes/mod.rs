//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod audit;
pub mod cash;
pub mod closings;
pub mod error;
pub mod health;
pub mod orders;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(orders::routes())
        .merge(cash::routes())
        .merge(closings::routes())
        .merge(audit::routes())
}
