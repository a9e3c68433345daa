//! The reqwest-based fuel-backend client.

use std::time::Instant;

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::config::FuelBackendConfig;
use crate::client::error::FuelBackendError;
use crate::client::models::{
    BackendHealth, BackendStatus, RawHealthResponse, RawTransactionsPage, ReportTransactionRequest,
    TransactionsPage, VerifyAuthorizationResponse,
};
use crate::client::retry::RetryPolicy;

/// Truncation bound for error-body snippets carried in errors.
const ERROR_BODY_LIMIT: usize = 512;

/// Typed HTTP boundary to the external fuel-backend system.
///
/// Construction validates the configuration, so a live instance is
/// always configured; transient failures are retried internally per the
/// configured policy and only the final typed error escapes.
#[derive(Debug, Clone)]
pub struct FuelBackendClient {
    config: FuelBackendConfig,
    http: Client,
    retry: RetryPolicy,
}

impl FuelBackendClient {
    /// Create a new client from validated configuration.
    pub fn new(config: FuelBackendConfig) -> Result<Self, FuelBackendError> {
        config.validate()?;

        let http = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("fleethub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FuelBackendError::NotConfigured {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        let retry = RetryPolicy::new(config.max_retries, config.retry_delay_ms);
        Ok(Self {
            config,
            http,
            retry,
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Check backend health.
    ///
    /// Never returns an error: any client failure is folded into an
    /// unhealthy result so callers can report status without branching.
    pub async fn check_health(&self) -> BackendHealth {
        let started = Instant::now();
        let result: Result<RawHealthResponse, FuelBackendError> = async {
            let response = self
                .authenticated(self.http.get(self.endpoint("health")))
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;
            self.parse_response(response).await
        }
        .await;
        let response_time_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(raw) => {
                let status = match raw.status.as_deref() {
                    Some("degraded") => BackendStatus::Degraded,
                    Some("maintenance") => BackendStatus::Maintenance,
                    Some("offline") => BackendStatus::Offline,
                    _ => BackendStatus::Online,
                };
                BackendHealth {
                    healthy: matches!(status, BackendStatus::Online | BackendStatus::Degraded),
                    status,
                    response_time_ms,
                    version: raw.version,
                    error: None,
                }
            }
            Err(error) => {
                debug!(error = %error, "Fuel backend health check failed");
                let status = match &error {
                    FuelBackendError::Server { .. } | FuelBackendError::RateLimited { .. } => {
                        BackendStatus::Degraded
                    }
                    _ => BackendStatus::Offline,
                };
                BackendHealth {
                    healthy: false,
                    status,
                    response_time_ms,
                    version: None,
                    error: Some(error.to_string()),
                }
            }
        }
    }

    /// Fetch one cursor-paginated page of transactions in the window.
    pub async fn fetch_transactions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<TransactionsPage, FuelBackendError> {
        let raw: RawTransactionsPage = self
            .retry
            .execute("fetch_transactions", || async move {
                let mut request = self
                    .authenticated(self.http.get(self.endpoint("transactions")))
                    .query(&[
                        ("from", from.to_rfc3339()),
                        ("to", to.to_rfc3339()),
                        ("limit", limit.to_string()),
                    ]);
                if let Some(cursor) = cursor {
                    request = request.query(&[("cursor", cursor)]);
                }
                let response = request.send().await.map_err(|e| self.transport_error(e))?;
                self.parse_response(response).await
            })
            .await?;
        Ok(raw.normalize())
    }

    /// Ask the backend to verify an authorization code it was shown.
    pub async fn verify_authorization(
        &self,
        auth_code: &str,
    ) -> Result<VerifyAuthorizationResponse, FuelBackendError> {
        self.retry
            .execute("verify_authorization", || async move {
                let response = self
                    .authenticated(self.http.post(self.endpoint("authorizations/verify")))
                    .json(&serde_json::json!({ "authCode": auth_code }))
                    .send()
                    .await
                    .map_err(|e| self.transport_error(e))?;
                self.parse_response(response).await
            })
            .await
    }

    /// Push a locally-recorded transaction to the backend.
    pub async fn report_transaction(
        &self,
        request: &ReportTransactionRequest,
    ) -> Result<(), FuelBackendError> {
        self.retry
            .execute("report_transaction", || async move {
                let response = self
                    .authenticated(self.http.post(self.endpoint("transactions")))
                    .json(request)
                    .send()
                    .await
                    .map_err(|e| self.transport_error(e))?;
                self.check_status(response).await
            })
            .await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Attach the auth headers. `X-Timestamp` accompanies every request;
    /// the request signature derived from the API secret is reserved for
    /// a future backend revision.
    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        let mut request = request
            .header("X-API-Key", &self.config.api_key)
            .header("X-Timestamp", Utc::now().timestamp().to_string());
        if let Some(org_id) = &self.config.external_org_id {
            request = request.header("X-Organization-ID", org_id);
        }
        request
    }

    fn transport_error(&self, error: reqwest::Error) -> FuelBackendError {
        if error.is_timeout() {
            FuelBackendError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            FuelBackendError::Network {
                message: error.to_string(),
            }
        }
    }

    /// Classify a non-success status, or deserialize the success body.
    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, FuelBackendError> {
        let response = self.classify(response).await?;
        response.json().await.map_err(|e| FuelBackendError::Parse {
            message: e.to_string(),
        })
    }

    /// Classify a non-success status, discarding any success body.
    async fn check_status(&self, response: Response) -> Result<(), FuelBackendError> {
        self.classify(response).await.map(|_| ())
    }

    async fn classify(&self, response: Response) -> Result<Response, FuelBackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after_secs = retry_after_seconds(&response);
        let mut body = response.text().await.unwrap_or_default();
        body.truncate(ERROR_BODY_LIMIT);
        let error = FuelBackendError::from_status(status.as_u16(), retry_after_secs, body);
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "Fuel backend rejected credentials");
        }
        Err(error)
    }
}

fn retry_after_seconds(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
