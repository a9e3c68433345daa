//! Fuel authorization lifecycle handlers.

use axum::Json;
use axum::extract::{Path, State};
use tracing::warn;

use fleethub_core::error::AppError;
use fleethub_entity::fuel::FuelAuthorization;
use fleethub_fuel::authorization::{
    CompleteAuthorization, CompletionOutcome, RequestAuthorization, ValidatedAuthorization,
};
use fleethub_integration::client::ReportTransactionRequest;
use validator::Validate;

use crate::dto::request::{
    CancelAuthorizationRequest, CompleteAuthorizationRequest, RequestAuthorizationRequest,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::state::AppState;

/// POST /api/fuel/authorizations
pub async fn request_authorization(
    State(state): State<AppState>,
    CallerIdentity(ctx): CallerIdentity,
    Json(req): Json<RequestAuthorizationRequest>,
) -> Result<Json<ApiResponse<FuelAuthorization>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::App(AppError::validation(e.to_string())))?;

    let authorization = state
        .fuel_service
        .request(
            &ctx,
            RequestAuthorization {
                asset_id: req.asset_id,
                operator_session_id: req.operator_session_id,
                max_quantity_litres: req.max_quantity_litres,
                max_amount_dollars: req.max_amount_dollars,
                expiry_minutes: req.expiry_minutes,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(authorization)))
}

/// POST /api/fuel/authorizations/{code}/validate
///
/// The bowser-facing callback: resolves the code, transitions a pending
/// authorization to `authorized`, and returns it with joined context.
pub async fn validate_authorization(
    State(state): State<AppState>,
    CallerIdentity(ctx): CallerIdentity,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<ValidatedAuthorization>>, ApiError> {
    let validated = state
        .fuel_service
        .validate(ctx.organisation_id, &code)
        .await?;
    Ok(Json(ApiResponse::ok(validated)))
}

/// POST /api/fuel/authorizations/{code}/complete
pub async fn complete_authorization(
    State(state): State<AppState>,
    CallerIdentity(ctx): CallerIdentity,
    Path(code): Path<String>,
    Json(req): Json<CompleteAuthorizationRequest>,
) -> Result<Json<ApiResponse<CompletionOutcome>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::App(AppError::validation(e.to_string())))?;

    let outcome = state
        .fuel_service
        .complete(
            ctx.organisation_id,
            CompleteAuthorization {
                auth_code: code,
                quantity_litres: req.quantity_litres,
                unit_cost: req.unit_cost,
                total_cost: req.total_cost,
                odometer_km: req.odometer_km,
                engine_hours: req.engine_hours,
                location: req.location,
                vendor: req.vendor,
                notes: req.notes,
            },
        )
        .await?;

    report_to_backend(&state, &outcome);

    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/fuel/authorizations/{code}/cancel
pub async fn cancel_authorization(
    State(state): State<AppState>,
    CallerIdentity(ctx): CallerIdentity,
    Path(code): Path<String>,
    Json(req): Json<CancelAuthorizationRequest>,
) -> Result<Json<ApiResponse<FuelAuthorization>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::App(AppError::validation(e.to_string())))?;

    let authorization = state.fuel_service.cancel(&ctx, &code, req.reason).await?;
    Ok(Json(ApiResponse::ok(authorization)))
}

/// Push a locally-completed transaction to the external backend.
/// Fire-and-forget: failures are logged and never affect the caller.
fn report_to_backend(state: &AppState, outcome: &CompletionOutcome) {
    let Some(client) = state.backend_client.clone() else {
        return;
    };
    let asset_repo = state.asset_repo.clone();
    let transaction = outcome.transaction.clone();
    let auth_code = outcome.authorization.auth_code.clone();

    tokio::spawn(async move {
        let vehicle_id = match asset_repo.find_by_id(transaction.asset_id).await {
            Ok(Some(asset)) => asset.asset_number,
            _ => transaction.asset_id.to_string(),
        };
        let request = ReportTransactionRequest {
            internal_id: transaction.id.to_string(),
            authorization_code: Some(auth_code),
            vehicle_id,
            driver_id: None,
            quantity_litres: transaction.quantity_litres,
            total_cost: transaction.total_cost,
            transaction_date: transaction.transaction_date,
            latitude: None,
            longitude: None,
        };
        if let Err(e) = client.report_transaction(&request).await {
            warn!(
                transaction_id = %transaction.id,
                error = %e,
                "Failed to report completed transaction to fuel backend"
            );
        }
    });
}
