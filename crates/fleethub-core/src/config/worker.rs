//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether scheduled background tasks are enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron schedule for the stale-authorization sweep.
    #[serde(default = "default_expiry_sweep_cron")]
    pub expiry_sweep_cron: String,
    /// Cron schedule for the fuel-backend sync.
    #[serde(default = "default_fuel_sync_cron")]
    pub fuel_sync_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            expiry_sweep_cron: default_expiry_sweep_cron(),
            fuel_sync_cron: default_fuel_sync_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_expiry_sweep_cron() -> String {
    "0 */5 * * * *".to_string()
}

fn default_fuel_sync_cron() -> String {
    "0 */15 * * * *".to_string()
}
