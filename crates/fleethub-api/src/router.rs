//! Route table.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{fuel, health, integration};
use crate::state::AppState;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route(
            "/api/fuel/authorizations",
            post(fuel::request_authorization),
        )
        .route(
            "/api/fuel/authorizations/{code}/validate",
            post(fuel::validate_authorization),
        )
        .route(
            "/api/fuel/authorizations/{code}/complete",
            post(fuel::complete_authorization),
        )
        .route(
            "/api/fuel/authorizations/{code}/cancel",
            post(fuel::cancel_authorization),
        )
        .route(
            "/api/integrations/fuel-backend/health",
            get(integration::integration_health),
        )
        .route(
            "/api/integrations/fuel-backend/history",
            get(integration::sync_history),
        )
        .route(
            "/api/integrations/fuel-backend/sync",
            post(integration::trigger_sync),
        )
        .route(
            "/api/integrations/fuel-backend/verify",
            post(integration::verify_code),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
