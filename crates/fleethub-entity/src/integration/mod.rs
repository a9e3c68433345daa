//! Integration health and sync history entities.

pub mod health;
pub mod sync_history;

pub use health::{IntegrationHealth, IntegrationStatus};
pub use sync_history::{IntegrationSyncHistory, SyncRunCounts};
