//! # fleethub-integration
//!
//! The boundary to the external fuel-backend system: a resilient HTTP
//! client (auth, timeout, retry/backoff, typed error taxonomy) and the
//! reconciliation engine that ingests external transactions, matches
//! them against locally-issued authorizations, classifies discrepancies,
//! and tracks integration health across runs.

pub mod client;
pub mod sync;

pub use client::{FuelBackendClient, FuelBackendConfig, FuelBackendError};
pub use sync::{FuelSyncEngine, SyncRunSummary, INTEGRATION_TYPE_FUEL_BACKEND};
