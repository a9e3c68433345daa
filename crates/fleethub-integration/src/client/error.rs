//! Typed error taxonomy for the fuel-backend client.

use thiserror::Error;

use fleethub_core::error::AppError;

/// Errors from the external fuel-backend boundary.
///
/// Every variant carries a retryability classification: transient
/// failures are retried with backoff inside the client, and only the
/// final non-retryable (or retry-exhausted) error crosses the client
/// boundary.
#[derive(Debug, Clone, Error)]
pub enum FuelBackendError {
    /// The integration is missing or invalid configuration. Checked
    /// before any network call is attempted.
    #[error("Fuel backend is not configured: {reason}")]
    NotConfigured {
        /// What is missing or invalid.
        reason: String,
    },

    /// The request never produced an HTTP response.
    #[error("Network error talking to fuel backend: {message}")]
    Network {
        /// Transport-level failure description.
        message: String,
    },

    /// The request was cancelled after the configured timeout.
    #[error("Fuel backend request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that was enforced.
        timeout_ms: u64,
    },

    /// The backend rejected our credentials (401/403).
    #[error("Fuel backend rejected credentials (HTTP {status})")]
    Auth {
        /// The HTTP status returned.
        status: u16,
    },

    /// The backend throttled us (429).
    #[error("Fuel backend rate limited the request")]
    RateLimited {
        /// Seconds to wait, from the Retry-After header if present.
        retry_after_secs: Option<u64>,
    },

    /// The backend failed server-side (5xx).
    #[error("Fuel backend server error (HTTP {status}): {message}")]
    Server {
        /// The HTTP status returned.
        status: u16,
        /// Response body, truncated.
        message: String,
    },

    /// The backend rejected the request (4xx other than auth/rate-limit).
    #[error("Fuel backend rejected the request (HTTP {status}): {message}")]
    Client {
        /// The HTTP status returned.
        status: u16,
        /// Response body, truncated.
        message: String,
    },

    /// A success response carried a body we could not parse.
    #[error("Failed to parse fuel backend response: {message}")]
    Parse {
        /// Parse failure description.
        message: String,
    },

    /// Anything that defied classification.
    #[error("Unexpected fuel backend error: {message}")]
    Unknown {
        /// Failure description.
        message: String,
    },
}

impl FuelBackendError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotConfigured { .. } => "NOT_CONFIGURED",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Auth { .. } => "AUTH_ERROR",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Server { .. } => "SERVER_ERROR",
            Self::Client { .. } => "CLIENT_ERROR",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Unknown { .. } => "UNKNOWN",
        }
    }

    /// Whether the operation may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Timeout { .. }
                | Self::RateLimited { .. }
                | Self::Server { .. }
        )
    }

    /// Classify a non-success HTTP status into the taxonomy.
    pub fn from_status(status: u16, retry_after_secs: Option<u64>, message: String) -> Self {
        match status {
            401 | 403 => Self::Auth { status },
            429 => Self::RateLimited { retry_after_secs },
            500..=599 => Self::Server { status, message },
            400..=499 => Self::Client { status, message },
            _ => Self::Unknown {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }
}

impl From<FuelBackendError> for AppError {
    fn from(err: FuelBackendError) -> Self {
        match &err {
            FuelBackendError::NotConfigured { .. } => {
                AppError::configuration(err.to_string())
            }
            _ => AppError::external_service(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_are_not_retryable() {
        for status in [401, 403] {
            let err = FuelBackendError::from_status(status, None, String::new());
            assert_eq!(err.code(), "AUTH_ERROR");
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn test_rate_limit_is_retryable() {
        let err = FuelBackendError::from_status(429, Some(30), String::new());
        assert_eq!(err.code(), "RATE_LIMITED");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_server_errors_are_retryable() {
        for status in [500, 502, 503] {
            let err = FuelBackendError::from_status(status, None, "oops".to_string());
            assert_eq!(err.code(), "SERVER_ERROR");
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn test_other_client_errors_are_not_retryable() {
        for status in [400, 404, 422] {
            let err = FuelBackendError::from_status(status, None, String::new());
            assert_eq!(err.code(), "CLIENT_ERROR");
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn test_timeout_and_network_are_retryable() {
        assert!(FuelBackendError::Timeout { timeout_ms: 30_000 }.is_retryable());
        assert!(
            FuelBackendError::Network {
                message: "connection reset".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_parse_and_config_errors_are_not_retryable() {
        assert!(
            !FuelBackendError::Parse {
                message: "bad json".to_string()
            }
            .is_retryable()
        );
        assert!(
            !FuelBackendError::NotConfigured {
                reason: "no url".to_string()
            }
            .is_retryable()
        );
    }
}
