//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{error, info};

use fleethub_core::config::worker::WorkerConfig;
use fleethub_core::error::AppError;

use crate::jobs::{ExpirySweepJob, FuelSyncJob};

/// Cron-based scheduler for periodic background tasks.
pub struct CronScheduler {
    scheduler: JobScheduler,
    config: WorkerConfig,
    expiry_sweep: Arc<ExpirySweepJob>,
    fuel_sync: Arc<FuelSyncJob>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(
        config: WorkerConfig,
        expiry_sweep: Arc<ExpirySweepJob>,
        fuel_sync: Arc<FuelSyncJob>,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            config,
            expiry_sweep,
            fuel_sync,
        })
    }

    /// Register all scheduled tasks.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_expiry_sweep().await?;
        self.register_fuel_sync().await?;
        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }

    /// Stale authorization sweep.
    async fn register_expiry_sweep(&self) -> Result<(), AppError> {
        let job = Arc::clone(&self.expiry_sweep);
        let schedule = self.config.expiry_sweep_cron.clone();
        let cron_job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                job.run().await;
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create expiry_sweep schedule: {e}"))
        })?;

        self.scheduler.add(cron_job).await.map_err(|e| {
            AppError::internal(format!("Failed to add expiry_sweep schedule: {e}"))
        })?;

        info!(schedule = %schedule, "Registered: expiry_sweep");
        Ok(())
    }

    /// Fuel backend reconciliation sync.
    async fn register_fuel_sync(&self) -> Result<(), AppError> {
        let job = Arc::clone(&self.fuel_sync);
        let schedule = self.config.fuel_sync_cron.clone();
        let cron_job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                job.run().await;
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create fuel_sync schedule: {e}")))?;

        self.scheduler.add(cron_job).await.map_err(|e| {
            error!(error = %e, "Could not register fuel_sync");
            AppError::internal(format!("Failed to add fuel_sync schedule: {e}"))
        })?;

        info!(schedule = %schedule, "Registered: fuel_sync");
        Ok(())
    }
}
