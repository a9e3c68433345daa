//! # fleethub-api
//!
//! Thin axum surface for the fuel subsystem: authorization lifecycle
//! endpoints for operator apps and bowsers, and integration
//! health/history endpoints for fleet managers.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
