//! Stale fuel authorization sweep.

use std::sync::Arc;

use tracing::{debug, error};

use fleethub_fuel::FuelAuthorizationService;

/// Bulk-expires live authorizations past their validity window.
///
/// Expiry is also detected lazily on any read, so this sweep is purely
/// self-healing for rows nobody touches; running it twice is harmless.
#[derive(Debug, Clone)]
pub struct ExpirySweepJob {
    service: Arc<FuelAuthorizationService>,
}

impl ExpirySweepJob {
    /// Create a new sweep job.
    pub fn new(service: Arc<FuelAuthorizationService>) -> Self {
        Self { service }
    }

    /// Run one sweep.
    pub async fn run(&self) {
        match self.service.expire_stale().await {
            Ok(0) => debug!("Expiry sweep: nothing to expire"),
            Ok(count) => debug!(count, "Expiry sweep transitioned stale authorizations"),
            Err(e) => error!(error = %e, "Expiry sweep failed"),
        }
    }
}
