//! Request extractors.
//!
//! Caller identity arrives from the platform gateway as trusted
//! headers; the fuel subsystem does not verify credentials itself.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use fleethub_core::error::AppError;
use fleethub_entity::user::UserRole;
use fleethub_fuel::RequestContext;

use crate::error::ApiError;

/// Header carrying the caller's organisation id.
pub const HEADER_ORGANISATION_ID: &str = "x-organisation-id";
/// Header carrying the caller's user id.
pub const HEADER_USER_ID: &str = "x-user-id";
/// Header carrying the caller's role.
pub const HEADER_USER_ROLE: &str = "x-user-role";

/// The authenticated caller, extracted from gateway headers.
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub RequestContext);

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let organisation_id = required_uuid(parts, HEADER_ORGANISATION_ID)?;
        let user_id = required_uuid(parts, HEADER_USER_ID)?;
        let role = match header_value(parts, HEADER_USER_ROLE)? {
            "admin" => UserRole::Admin,
            "manager" => UserRole::Manager,
            "operator" => UserRole::Operator,
            other => {
                return Err(ApiError::App(AppError::authorization(format!(
                    "Unknown role {other:?}"
                ))));
            }
        };

        Ok(Self(RequestContext::new(organisation_id, user_id, role)))
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::App(AppError::authorization(format!("Missing {name} header")))
        })
}

fn required_uuid(parts: &Parts, name: &str) -> Result<Uuid, ApiError> {
    header_value(parts, name)?.parse().map_err(|_| {
        ApiError::App(AppError::authorization(format!(
            "Header {name} is not a valid UUID"
        )))
    })
}
