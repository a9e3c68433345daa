//! Exponential backoff retry for fuel-backend operations.

use std::time::Duration;

use tracing::{debug, warn};

use crate::client::error::FuelBackendError;

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Number of retries after the initial attempt (0 = no retries).
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub retry_delay_ms: u64,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_retries: u32, retry_delay_ms: u64) -> Self {
        Self {
            max_retries,
            retry_delay_ms,
        }
    }

    /// Delay before retry number `attempt` (1-based):
    /// `retry_delay_ms * 2^(attempt-1)`.
    ///
    /// A rate-limit response carrying a Retry-After value overrides the
    /// exponential schedule.
    pub fn delay_for(&self, attempt: u32, error: &FuelBackendError) -> Duration {
        if let FuelBackendError::RateLimited {
            retry_after_secs: Some(secs),
        } = error
        {
            return Duration::from_secs(*secs);
        }
        let exponent = attempt.saturating_sub(1);
        let millis = self
            .retry_delay_ms
            .saturating_mul(2u64.saturating_pow(exponent));
        Duration::from_millis(millis)
    }

    /// Execute an async operation with retry.
    ///
    /// The closure is called until it succeeds, returns a non-retryable
    /// error, or the retry budget is exhausted; the final error is
    /// propagated unchanged so callers see the typed taxonomy.
    pub async fn execute<F, Fut, T>(
        &self,
        operation: &str,
        mut f: F,
    ) -> Result<T, FuelBackendError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, FuelBackendError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(operation, attempts = attempt + 1, "Succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) if error.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for(attempt, &error);
                    debug!(
                        operation,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    if error.is_retryable() {
                        warn!(
                            operation,
                            attempts = attempt + 1,
                            error = %error,
                            "Retries exhausted"
                        );
                    }
                    return Err(error);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> FuelBackendError {
        FuelBackendError::Network {
            message: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy::new(5, 1000);
        let err = transient();
        assert_eq!(policy.delay_for(1, &err), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2, &err), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3, &err), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(4, &err), Duration::from_millis(8000));
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let policy = RetryPolicy::new(5, 1000);
        let err = FuelBackendError::RateLimited {
            retry_after_secs: Some(7),
        };
        assert_eq!(policy.delay_for(1, &err), Duration::from_secs(7));
        assert_eq!(policy.delay_for(3, &err), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_succeeds_first_try() {
        let policy = RetryPolicy::new(3, 0);
        let result = policy
            .execute("op", || async { Ok::<_, FuelBackendError>(42) })
            .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let policy = RetryPolicy::new(3, 0);
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();
        let result = policy
            .execute("op", move || {
                let c = c.clone();
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(transient())
                    } else {
                        Ok(99)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_immediately() {
        let policy = RetryPolicy::new(3, 0);
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();
        let result: Result<(), _> = policy
            .execute("op", move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(FuelBackendError::Auth { status: 401 })
                }
            })
            .await;
        assert!(matches!(result, Err(FuelBackendError::Auth { .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_propagate_final_error() {
        let policy = RetryPolicy::new(2, 0);
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();
        let result: Result<(), _> = policy
            .execute("op", move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(transient())
                }
            })
            .await;
        assert!(matches!(result, Err(FuelBackendError::Network { .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 3); // initial + 2 retries
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let policy = RetryPolicy::new(0, 0);
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();
        let result: Result<(), _> = policy
            .execute("op", move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(transient())
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
