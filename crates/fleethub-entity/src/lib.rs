//! # fleethub-entity
//!
//! Domain entity models for FleetHub. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod asset;
pub mod audit;
pub mod fuel;
pub mod integration;
pub mod organisation;
pub mod session;
pub mod user;
