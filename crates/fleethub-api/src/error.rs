//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use fleethub_core::error::{AppError, ErrorKind};
use fleethub_fuel::FuelAuthError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Unified error type returned by all handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A fuel authorization state machine error with a precise code.
    Fuel(FuelAuthError),
    /// A general application error.
    App(AppError),
}

impl From<FuelAuthError> for ApiError {
    fn from(err: FuelAuthError) -> Self {
        Self::Fuel(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Self::Fuel(err) => {
                let status = match &err {
                    FuelAuthError::NotFound => StatusCode::NOT_FOUND,
                    FuelAuthError::Forbidden => StatusCode::FORBIDDEN,
                    FuelAuthError::NoActiveSession
                    | FuelAuthError::InvalidExpiryWindow { .. }
                    | FuelAuthError::InvalidQuantity
                    | FuelAuthError::ExceedsQuantityLimit { .. }
                    | FuelAuthError::ExceedsAmountLimit { .. } => StatusCode::BAD_REQUEST,
                    FuelAuthError::ExistingAuthorization
                    | FuelAuthError::AlreadyCompleted
                    | FuelAuthError::AlreadyCancelled
                    | FuelAuthError::Expired
                    | FuelAuthError::SessionEnded => StatusCode::CONFLICT,
                    FuelAuthError::CodeSpaceExhausted | FuelAuthError::Store(_) => {
                        tracing::error!(error = %err, "Fuel authorization internal error");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    "Internal server error".to_string()
                } else {
                    err.to_string()
                };
                (status, err.code().to_string(), message)
            }
            Self::App(err) => {
                let (status, code) = match err.kind {
                    ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                    ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
                    ErrorKind::ServiceUnavailable => {
                        (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
                    }
                    ErrorKind::ExternalService => (StatusCode::BAD_GATEWAY, "EXTERNAL_SERVICE"),
                    _ => {
                        tracing::error!(error = %err, "Internal server error");
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    "Internal server error".to_string()
                } else {
                    err.message.clone()
                };
                (status, code.to_string(), message)
            }
        };

        let body = ApiErrorResponse { error, message };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_fuel_error_statuses() {
        assert_eq!(
            status_of(ApiError::Fuel(FuelAuthError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Fuel(FuelAuthError::AlreadyCompleted)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::Fuel(FuelAuthError::ExceedsQuantityLimit {
                attempted: 60.0,
                limit: 50.0,
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Fuel(FuelAuthError::Forbidden)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ApiError::Fuel(FuelAuthError::CodeSpaceExhausted)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_statuses() {
        assert_eq!(
            status_of(ApiError::App(AppError::validation("bad input"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::App(AppError::database("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
