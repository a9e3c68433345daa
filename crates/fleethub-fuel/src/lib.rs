//! # fleethub-fuel
//!
//! The fuel authorization subsystem: short-code generation, the QR
//! payload codec, and the authorization state machine service.
//!
//! An operator with an active vehicle session requests an authorization
//! and receives a code plus a scannable payload; a bowser later calls
//! back to validate and complete it. Authorizations that are never
//! completed locally are picked up by the reconciliation engine in
//! `fleethub-integration`.

pub mod authorization;
pub mod code;
pub mod context;
pub mod qr;

pub use authorization::{FuelAuthError, FuelAuthorizationService};
pub use context::RequestContext;
pub use qr::QrPayload;
