//! Scheduled job implementations.

pub mod expiry;
pub mod fuel_sync;

pub use expiry::ExpirySweepJob;
pub use fuel_sync::FuelSyncJob;
