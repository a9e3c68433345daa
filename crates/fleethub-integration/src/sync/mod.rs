//! Reconciliation of external fuel transactions against local
//! authorizations.

pub mod discrepancy;
pub mod engine;

pub use engine::{FuelSyncEngine, SyncRecordError, SyncRunSummary, INTEGRATION_TYPE_FUEL_BACKEND};
