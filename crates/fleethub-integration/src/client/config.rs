//! Fuel-backend client configuration.
//!
//! Sourced from the `FUEL_BACKEND_*` environment variables. The
//! integration is optional: with neither a URL nor an API key present,
//! [`FuelBackendConfig::from_env`] reports the integration as simply not
//! set up, while a partial or invalid configuration is an error worth
//! surfacing.

use crate::client::error::FuelBackendError;

/// Environment variable holding the backend base URL.
pub const ENV_URL: &str = "FUEL_BACKEND_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "FUEL_BACKEND_API_KEY";
/// Environment variable holding the optional API secret.
pub const ENV_API_SECRET: &str = "FUEL_BACKEND_API_SECRET";
/// Environment variable overriding the request timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "FUEL_BACKEND_TIMEOUT_MS";
/// Environment variable overriding the retry count.
pub const ENV_MAX_RETRIES: &str = "FUEL_BACKEND_MAX_RETRIES";
/// Environment variable overriding the base retry delay in milliseconds.
pub const ENV_RETRY_DELAY_MS: &str = "FUEL_BACKEND_RETRY_DELAY_MS";
/// Environment variable holding the optional tenant id header value.
pub const ENV_ORG_ID: &str = "FUEL_BACKEND_ORG_ID";

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Minimum accepted request timeout. Anything lower cannot complete a
/// TLS handshake to the backend reliably.
const MIN_TIMEOUT_MS: u64 = 1_000;

/// Validated configuration for the external fuel-backend client.
#[derive(Debug, Clone)]
pub struct FuelBackendConfig {
    /// Base URL of the backend API.
    pub base_url: String,
    /// API key sent as `X-API-Key`.
    pub api_key: String,
    /// API secret, reserved for signed requests.
    pub api_secret: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff in milliseconds.
    pub retry_delay_ms: u64,
    /// Tenant id sent as `X-Organization-ID`, if the backend is
    /// multi-tenant.
    pub external_org_id: Option<String>,
}

impl FuelBackendConfig {
    /// Read and validate the configuration from the environment.
    ///
    /// Returns `Ok(None)` when the integration is not set up at all
    /// (neither URL nor API key present), `Err` for a partial or invalid
    /// configuration, and `Ok(Some(config))` otherwise.
    pub fn from_env() -> Result<Option<Self>, FuelBackendError> {
        let base_url = read_env(ENV_URL);
        let api_key = read_env(ENV_API_KEY);

        let (base_url, api_key) = match (base_url, api_key) {
            (None, None) => return Ok(None),
            (Some(url), Some(key)) => (url, key),
            (Some(_), None) => {
                return Err(not_configured(format!("{ENV_API_KEY} is not set")));
            }
            (None, Some(_)) => {
                return Err(not_configured(format!("{ENV_URL} is not set")));
            }
        };

        let config = Self {
            base_url,
            api_key,
            api_secret: read_env(ENV_API_SECRET),
            timeout_ms: read_numeric(ENV_TIMEOUT_MS, DEFAULT_TIMEOUT_MS)?,
            max_retries: read_numeric(ENV_MAX_RETRIES, DEFAULT_MAX_RETRIES)?,
            retry_delay_ms: read_numeric(ENV_RETRY_DELAY_MS, DEFAULT_RETRY_DELAY_MS)?,
            external_org_id: read_env(ENV_ORG_ID),
        };
        config.validate()?;
        Ok(Some(config))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), FuelBackendError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| not_configured(format!("{ENV_URL} is not a valid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(not_configured(format!(
                "{ENV_URL} must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.api_key.is_empty() {
            return Err(not_configured(format!("{ENV_API_KEY} is empty")));
        }
        if self.timeout_ms < MIN_TIMEOUT_MS {
            return Err(not_configured(format!(
                "{ENV_TIMEOUT_MS} must be at least {MIN_TIMEOUT_MS}, got {}",
                self.timeout_ms
            )));
        }
        Ok(())
    }

    /// Whether the configuration passes full validation.
    pub fn is_configured(&self) -> bool {
        self.validate().is_ok()
    }
}

fn not_configured(reason: String) -> FuelBackendError {
    FuelBackendError::NotConfigured { reason }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn read_numeric<T: std::str::FromStr>(name: &str, default: T) -> Result<T, FuelBackendError> {
    match read_env(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| not_configured(format!("{name} is not a valid number: {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FuelBackendConfig {
        FuelBackendConfig {
            base_url: "https://fuel.example.com/api/v1".to_string(),
            api_key: "test-key".to_string(),
            api_secret: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            external_org_id: None,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(config().is_configured());
    }

    #[test]
    fn test_invalid_url_fails() {
        let mut cfg = config();
        cfg.base_url = "not a url".to_string();
        assert!(!cfg.is_configured());
    }

    #[test]
    fn test_non_http_scheme_fails() {
        let mut cfg = config();
        cfg.base_url = "ftp://fuel.example.com".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, FuelBackendError::NotConfigured { .. }));
    }

    #[test]
    fn test_empty_api_key_fails() {
        let mut cfg = config();
        cfg.api_key = String::new();
        assert!(!cfg.is_configured());
    }

    #[test]
    fn test_timeout_below_floor_fails() {
        let mut cfg = config();
        cfg.timeout_ms = 500;
        assert!(!cfg.is_configured());
    }
}
