//! The fuel authorization state machine.
//!
//! States: `pending → authorized → completed` on the happy path, with
//! `cancelled` and `expired` as terminal side-exits. No transition
//! leaves a terminal state.

pub mod error;
pub mod limits;
pub mod service;

pub use error::FuelAuthError;
pub use service::{
    CompleteAuthorization, CompletionOutcome, FuelAuthorizationService, RequestAuthorization,
    ValidatedAuthorization,
};
