//! # fleethub-database
//!
//! PostgreSQL database connection management and concrete repository
//! implementations for all FleetHub entities.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
