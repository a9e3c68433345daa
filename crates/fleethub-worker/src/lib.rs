//! Scheduled background tasks for FleetHub.
//!
//! Two periodic tasks keep the fuel subsystem honest without any
//! operator involvement: the stale-authorization sweep and the
//! fuel-backend reconciliation sync. Both are idempotent, so the cron
//! scheduler invokes the services directly.

pub mod jobs;
pub mod scheduler;

pub use scheduler::CronScheduler;
