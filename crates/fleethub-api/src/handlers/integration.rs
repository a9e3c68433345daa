//! Integration health, history, and sync trigger handlers.

use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use fleethub_core::error::AppError;
use fleethub_entity::integration::IntegrationSyncHistory;
use fleethub_integration::client::{BackendHealth, VerifyAuthorizationResponse};
use fleethub_integration::{FuelSyncEngine, INTEGRATION_TYPE_FUEL_BACKEND, SyncRunSummary};

use crate::dto::request::{TriggerSyncRequest, VerifyCodeRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::state::AppState;

/// Combined local and live health view of the fuel-backend integration.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IntegrationHealthView {
    /// Whether a backend client is configured.
    pub configured: bool,
    /// Rolled-up health counters, absent before the first sync touch.
    pub health: Option<fleethub_entity::integration::IntegrationHealth>,
    /// Live backend health probe, when configured.
    pub backend: Option<BackendHealth>,
}

/// GET /api/integrations/fuel-backend/health
pub async fn integration_health(
    State(state): State<AppState>,
    CallerIdentity(ctx): CallerIdentity,
) -> Result<Json<ApiResponse<IntegrationHealthView>>, ApiError> {
    let health = state
        .health_repo
        .find(ctx.organisation_id, INTEGRATION_TYPE_FUEL_BACKEND)
        .await?;

    let backend = match &state.backend_client {
        Some(client) => Some(client.check_health().await),
        None => None,
    };

    Ok(Json(ApiResponse::ok(IntegrationHealthView {
        configured: state.backend_client.is_some(),
        health,
        backend,
    })))
}

/// Query parameters for the history listing.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryParams {
    /// Maximum rows to return.
    pub limit: Option<i64>,
}

/// GET /api/integrations/fuel-backend/history
pub async fn sync_history(
    State(state): State<AppState>,
    CallerIdentity(ctx): CallerIdentity,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<Vec<IntegrationSyncHistory>>>, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let runs = state
        .history_repo
        .list_recent(ctx.organisation_id, INTEGRATION_TYPE_FUEL_BACKEND, limit)
        .await?;
    Ok(Json(ApiResponse::ok(runs)))
}

/// POST /api/integrations/fuel-backend/sync
///
/// Manually trigger a reconciliation run. Admin-scoped.
pub async fn trigger_sync(
    State(state): State<AppState>,
    CallerIdentity(ctx): CallerIdentity,
    Json(req): Json<TriggerSyncRequest>,
) -> Result<Json<ApiResponse<SyncRunSummary>>, ApiError> {
    if !ctx.is_admin_scoped() {
        return Err(ApiError::App(AppError::authorization(
            "Only admins may trigger a sync",
        )));
    }

    let now = Utc::now();
    let (default_from, default_to) = {
        let health = state
            .health_repo
            .find_or_create(ctx.organisation_id, INTEGRATION_TYPE_FUEL_BACKEND)
            .await?;
        FuelSyncEngine::sync_window(&health, now)
    };

    let summary = state
        .sync_engine
        .run(
            ctx.organisation_id,
            req.from.unwrap_or(default_from),
            req.to.unwrap_or(default_to),
        )
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/integrations/fuel-backend/verify
///
/// Pass-through verification of an authorization code against the
/// external backend, for diagnosing bowser-side mismatches.
pub async fn verify_code(
    State(state): State<AppState>,
    CallerIdentity(_ctx): CallerIdentity,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<Json<ApiResponse<VerifyAuthorizationResponse>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::App(AppError::validation(e.to_string())))?;

    let client = state.backend_client.as_ref().ok_or_else(|| {
        ApiError::App(AppError::service_unavailable(
            "Fuel backend is not configured",
        ))
    })?;

    let response = client
        .verify_authorization(&req.auth_code)
        .await
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::ok(response)))
}
