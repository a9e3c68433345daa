//! Periodic fuel-backend reconciliation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use fleethub_database::repositories::{IntegrationHealthRepository, OrganisationRepository};
use fleethub_integration::{FuelSyncEngine, INTEGRATION_TYPE_FUEL_BACKEND};

/// Runs the reconciliation engine for every organisation on a schedule.
#[derive(Clone)]
pub struct FuelSyncJob {
    engine: Arc<FuelSyncEngine>,
    organisations: Arc<OrganisationRepository>,
    health: Arc<IntegrationHealthRepository>,
}

impl FuelSyncJob {
    /// Create a new sync job.
    pub fn new(
        engine: Arc<FuelSyncEngine>,
        organisations: Arc<OrganisationRepository>,
        health: Arc<IntegrationHealthRepository>,
    ) -> Self {
        Self {
            engine,
            organisations,
            health,
        }
    }

    /// Run one sync pass across all organisations.
    pub async fn run(&self) {
        if !self.engine.is_configured() {
            debug!("Fuel backend not configured, skipping scheduled sync");
            return;
        }

        let organisations = match self.organisations.find_all().await {
            Ok(orgs) => orgs,
            Err(e) => {
                error!(error = %e, "Failed to list organisations for fuel sync");
                return;
            }
        };

        for organisation in organisations {
            let health = match self
                .health
                .find_or_create(organisation.id, INTEGRATION_TYPE_FUEL_BACKEND)
                .await
            {
                Ok(health) => health,
                Err(e) => {
                    error!(
                        organisation_id = %organisation.id,
                        error = %e,
                        "Failed to load integration health"
                    );
                    continue;
                }
            };

            let (from, to) = FuelSyncEngine::sync_window(&health, Utc::now());
            match self.engine.run(organisation.id, from, to).await {
                Ok(summary) if summary.success => {}
                Ok(summary) => warn!(
                    organisation_id = %organisation.id,
                    error = ?summary.error_message,
                    "Scheduled fuel sync run failed"
                ),
                Err(e) => error!(
                    organisation_id = %organisation.id,
                    error = %e,
                    "Scheduled fuel sync could not record its outcome"
                ),
            }
        }
    }
}
