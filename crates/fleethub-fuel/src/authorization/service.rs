//! Fuel authorization lifecycle service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use fleethub_database::repositories::fuel_authorization::CompleteAuthorizationParams;
use fleethub_database::repositories::{
    AssetRepository, AuditLogRepository, FuelAuthorizationRepository, OperatorSessionRepository,
    UserRepository,
};
use fleethub_entity::asset::Asset;
use fleethub_entity::audit::CreateAuditLogEntry;
use fleethub_entity::fuel::{
    AuthorizationStatus, CreateFuelAuthorization, CreateFuelTransaction, FuelAuthorization,
    FuelTransaction, TransactionSource,
};
use fleethub_entity::session::OperatorSession;
use fleethub_entity::user::User;

use crate::authorization::FuelAuthError;
use crate::authorization::limits::enforce_limits;
use crate::code::generate_unique_auth_code;
use crate::context::RequestContext;
use crate::qr::QrPayload;

/// Minimum authorization validity window in minutes.
pub const MIN_EXPIRY_MINUTES: i64 = 5;
/// Maximum authorization validity window in minutes.
pub const MAX_EXPIRY_MINUTES: i64 = 60;
/// Default validity window when the request does not specify one.
pub const DEFAULT_EXPIRY_MINUTES: i64 = 30;

/// Inputs for requesting a new authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestAuthorization {
    /// The asset to be fuelled.
    pub asset_id: Uuid,
    /// The operator session the request is made from.
    pub operator_session_id: Uuid,
    /// Maximum litres the bowser may dispense, if capped.
    pub max_quantity_litres: Option<f64>,
    /// Maximum dollar amount, if capped.
    pub max_amount_dollars: Option<f64>,
    /// Validity window in minutes (5-60, default 30).
    pub expiry_minutes: Option<i64>,
}

/// Inputs for completing an authorization with a recorded dispense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteAuthorization {
    /// The authorization code (any case).
    pub auth_code: String,
    /// Litres dispensed. Must be positive.
    pub quantity_litres: f64,
    /// Cost per litre.
    pub unit_cost: Option<f64>,
    /// Total cost. Derived from `unit_cost` when absent.
    pub total_cost: Option<f64>,
    /// Odometer reading at fuelling time, in kilometres.
    pub odometer_km: Option<f64>,
    /// Engine hours at fuelling time.
    pub engine_hours: Option<f64>,
    /// Free-text location.
    pub location: Option<String>,
    /// Fuel vendor.
    pub vendor: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// An authorization resolved for a bowser, with joined context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedAuthorization {
    /// The authorization itself.
    pub authorization: FuelAuthorization,
    /// The asset to be fuelled.
    pub asset: Asset,
    /// The requesting operator.
    pub operator: User,
    /// The operator session the request was made from.
    pub session: OperatorSession,
}

/// Result of a successful completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOutcome {
    /// The authorization, now `completed`.
    pub authorization: FuelAuthorization,
    /// The fuel transaction recorded against it.
    pub transaction: FuelTransaction,
}

/// Owns the lifecycle of fuel authorizations: creation, validation,
/// completion, cancellation, and expiry.
#[derive(Debug, Clone)]
pub struct FuelAuthorizationService {
    authorizations: Arc<FuelAuthorizationRepository>,
    sessions: Arc<OperatorSessionRepository>,
    assets: Arc<AssetRepository>,
    users: Arc<UserRepository>,
    audit: Arc<AuditLogRepository>,
}

impl FuelAuthorizationService {
    /// Creates a new fuel authorization service.
    pub fn new(
        authorizations: Arc<FuelAuthorizationRepository>,
        sessions: Arc<OperatorSessionRepository>,
        assets: Arc<AssetRepository>,
        users: Arc<UserRepository>,
        audit: Arc<AuditLogRepository>,
    ) -> Self {
        Self {
            authorizations,
            sessions,
            assets,
            users,
            audit,
        }
    }

    /// Request a new authorization for the caller's active session.
    ///
    /// Preconditions: the caller holds an active session on the asset and
    /// has no other live pending authorization. A stale pending row past
    /// its window is expired in place and the new request proceeds.
    pub async fn request(
        &self,
        ctx: &RequestContext,
        input: RequestAuthorization,
    ) -> Result<FuelAuthorization, FuelAuthError> {
        let expiry_minutes = input.expiry_minutes.unwrap_or(DEFAULT_EXPIRY_MINUTES);
        if !(MIN_EXPIRY_MINUTES..=MAX_EXPIRY_MINUTES).contains(&expiry_minutes) {
            return Err(FuelAuthError::InvalidExpiryWindow {
                requested: expiry_minutes,
                min: MIN_EXPIRY_MINUTES,
                max: MAX_EXPIRY_MINUTES,
            });
        }

        let session = self
            .sessions
            .find_by_id(input.operator_session_id)
            .await?
            .ok_or(FuelAuthError::NoActiveSession)?;
        if !session.is_active()
            || session.organisation_id != ctx.organisation_id
            || session.operator_id != ctx.user_id
            || session.asset_id != input.asset_id
        {
            return Err(FuelAuthError::NoActiveSession);
        }

        let now = Utc::now();
        if let Some(existing) = self
            .authorizations
            .find_pending_by_session(session.id)
            .await?
        {
            if existing.is_expired_at(now) {
                self.authorizations.mark_expired(existing.id).await?;
                debug!(
                    authorization_id = %existing.id,
                    "Expired stale pending authorization before issuing a new one"
                );
            } else {
                return Err(FuelAuthError::ExistingAuthorization);
            }
        }

        let asset = self
            .assets
            .find_by_id(input.asset_id)
            .await?
            .ok_or(FuelAuthError::NotFound)?;
        let operator = self
            .users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or(FuelAuthError::NotFound)?;

        let auth_code =
            generate_unique_auth_code(&self.authorizations, ctx.organisation_id).await?;
        let expires_at = now + Duration::minutes(expiry_minutes);

        let payload = QrPayload::new(
            &auth_code,
            asset.id,
            &asset.asset_number,
            &operator.name,
            ctx.organisation_id,
            expires_at,
            input.max_quantity_litres,
            input.max_amount_dollars,
        );

        let authorization = self
            .authorizations
            .create(&CreateFuelAuthorization {
                organisation_id: ctx.organisation_id,
                asset_id: asset.id,
                operator_session_id: session.id,
                operator_id: operator.id,
                auth_code: auth_code.clone(),
                qr_code_data: payload.encode(),
                max_quantity_litres: input.max_quantity_litres,
                max_amount_dollars: input.max_amount_dollars,
                expires_at,
            })
            .await?;

        self.audit
            .create(&CreateAuditLogEntry {
                organisation_id: ctx.organisation_id,
                user_id: operator.id,
                action: "fuel_authorization.request".to_string(),
                entity_type: "fuel_authorization".to_string(),
                entity_id: Some(authorization.id),
                old_values: None,
                new_values: Some(serde_json::json!({
                    "auth_code": auth_code,
                    "asset_id": asset.id,
                    "expires_at": expires_at,
                    "max_quantity_litres": input.max_quantity_litres,
                    "max_amount_dollars": input.max_amount_dollars,
                })),
            })
            .await?;

        info!(
            authorization_id = %authorization.id,
            asset = %asset.asset_number,
            expires_at = %expires_at,
            "Issued fuel authorization"
        );
        Ok(authorization)
    }

    /// Validate a code on behalf of a bowser, transitioning a pending
    /// authorization to `authorized`.
    pub async fn validate(
        &self,
        organisation_id: Uuid,
        auth_code: &str,
    ) -> Result<ValidatedAuthorization, FuelAuthError> {
        let (mut authorization, mut session) = self.resolve(organisation_id, auth_code).await?;

        if authorization.status == AuthorizationStatus::Pending {
            if self.authorizations.mark_authorized(authorization.id).await? {
                authorization = self
                    .authorizations
                    .find_by_id(authorization.id)
                    .await?
                    .ok_or(FuelAuthError::NotFound)?;
            } else {
                // Lost a race with a concurrent transition; resolve again
                // so the caller gets the accurate state or error.
                (authorization, session) = self.resolve(organisation_id, auth_code).await?;
            }
        }

        let asset = self
            .assets
            .find_by_id(authorization.asset_id)
            .await?
            .ok_or(FuelAuthError::NotFound)?;
        let operator = self
            .users
            .find_by_id(authorization.operator_id)
            .await?
            .ok_or(FuelAuthError::NotFound)?;

        Ok(ValidatedAuthorization {
            authorization,
            asset,
            operator,
            session,
        })
    }

    /// Record a dispense against an authorization, transitioning it to
    /// `completed`.
    ///
    /// Enforces the pre-authorized ceilings, then atomically inserts the
    /// fuel transaction, binds it to the authorization, records new asset
    /// meter readings, and writes the audit entry. A concurrent completion
    /// surfaces as [`FuelAuthError::AlreadyCompleted`] with zero writes.
    pub async fn complete(
        &self,
        organisation_id: Uuid,
        input: CompleteAuthorization,
    ) -> Result<CompletionOutcome, FuelAuthError> {
        if input.quantity_litres <= 0.0 {
            return Err(FuelAuthError::InvalidQuantity);
        }

        let (authorization, _session) = self.resolve(organisation_id, &input.auth_code).await?;
        let total_cost = enforce_limits(
            &authorization,
            input.quantity_litres,
            input.unit_cost,
            input.total_cost,
        )?;

        let params = CompleteAuthorizationParams {
            transaction: CreateFuelTransaction {
                organisation_id,
                asset_id: authorization.asset_id,
                operator_id: authorization.operator_id,
                authorization_id: Some(authorization.id),
                quantity_litres: input.quantity_litres,
                unit_cost: input.unit_cost,
                total_cost,
                fuel_type: None,
                odometer_km: input.odometer_km,
                engine_hours: input.engine_hours,
                location: input.location,
                vendor: input.vendor,
                notes: input.notes,
                transaction_date: Utc::now(),
                source: TransactionSource::Synced,
                external_transaction_id: None,
                has_discrepancy: false,
                discrepancy_type: None,
                discrepancy_details: None,
            },
            odometer_km: input.odometer_km,
            engine_hours: input.engine_hours,
            audit: CreateAuditLogEntry {
                organisation_id,
                user_id: authorization.operator_id,
                action: "fuel_authorization.complete".to_string(),
                entity_type: "fuel_authorization".to_string(),
                entity_id: Some(authorization.id),
                old_values: Some(serde_json::json!({ "status": authorization.status })),
                new_values: Some(serde_json::json!({
                    "status": AuthorizationStatus::Completed,
                    "quantity_litres": input.quantity_litres,
                    "total_cost": total_cost,
                })),
            },
        };

        let (authorization, transaction) = self
            .authorizations
            .complete(authorization.id, &params)
            .await?
            .ok_or(FuelAuthError::AlreadyCompleted)?;

        info!(
            authorization_id = %authorization.id,
            transaction_id = %transaction.id,
            quantity_litres = input.quantity_litres,
            "Completed fuel authorization"
        );
        Ok(CompletionOutcome {
            authorization,
            transaction,
        })
    }

    /// Cancel a live authorization. Only the requesting operator or an
    /// admin-scoped caller may cancel.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        auth_code: &str,
        reason: Option<String>,
    ) -> Result<FuelAuthorization, FuelAuthError> {
        let (authorization, _session) = self.resolve(ctx.organisation_id, auth_code).await?;

        if authorization.operator_id != ctx.user_id && !ctx.is_admin_scoped() {
            return Err(FuelAuthError::Forbidden);
        }

        if !self.authorizations.mark_cancelled(authorization.id).await? {
            // A concurrent transition won; report the state it reached.
            let current = self
                .authorizations
                .find_by_id(authorization.id)
                .await?
                .ok_or(FuelAuthError::NotFound)?;
            return Err(match current.status {
                AuthorizationStatus::Completed => FuelAuthError::AlreadyCompleted,
                AuthorizationStatus::Expired => FuelAuthError::Expired,
                _ => FuelAuthError::AlreadyCancelled,
            });
        }

        self.audit
            .create(&CreateAuditLogEntry {
                organisation_id: ctx.organisation_id,
                user_id: ctx.user_id,
                action: "fuel_authorization.cancel".to_string(),
                entity_type: "fuel_authorization".to_string(),
                entity_id: Some(authorization.id),
                old_values: Some(serde_json::json!({ "status": authorization.status })),
                new_values: Some(serde_json::json!({
                    "status": AuthorizationStatus::Cancelled,
                    "reason": reason,
                })),
            })
            .await?;

        info!(authorization_id = %authorization.id, "Cancelled fuel authorization");
        self.authorizations
            .find_by_id(authorization.id)
            .await?
            .ok_or(FuelAuthError::NotFound)
    }

    /// Bulk-expire every live authorization past its window. Returns the
    /// number of rows transitioned; idempotent.
    pub async fn expire_stale(&self) -> Result<u64, FuelAuthError> {
        let expired = self.authorizations.expire_stale(Utc::now()).await?;
        if expired > 0 {
            info!(expired, "Expired stale fuel authorizations");
        }
        Ok(expired)
    }

    /// Locate an authorization by code and check it is still actionable.
    ///
    /// Shared by validate, complete, and cancel. Applies lazy expiry: a
    /// live row past its window is flipped to `expired` here (idempotently)
    /// and reported as [`FuelAuthError::Expired`].
    async fn resolve(
        &self,
        organisation_id: Uuid,
        auth_code: &str,
    ) -> Result<(FuelAuthorization, OperatorSession), FuelAuthError> {
        let authorization = self
            .authorizations
            .find_by_code(organisation_id, auth_code)
            .await?
            .ok_or(FuelAuthError::NotFound)?;

        match authorization.status {
            AuthorizationStatus::Completed => return Err(FuelAuthError::AlreadyCompleted),
            AuthorizationStatus::Cancelled => return Err(FuelAuthError::AlreadyCancelled),
            AuthorizationStatus::Expired => return Err(FuelAuthError::Expired),
            AuthorizationStatus::Pending | AuthorizationStatus::Authorized => {}
        }

        if authorization.is_expired_at(Utc::now()) {
            self.authorizations.mark_expired(authorization.id).await?;
            debug!(authorization_id = %authorization.id, "Lazily expired authorization on read");
            return Err(FuelAuthError::Expired);
        }

        let session = self
            .sessions
            .find_by_id(authorization.operator_session_id)
            .await?
            .ok_or(FuelAuthError::SessionEnded)?;
        if !session.is_active() {
            return Err(FuelAuthError::SessionEnded);
        }

        Ok((authorization, session))
    }
}
