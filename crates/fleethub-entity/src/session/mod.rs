//! Operator session entity.

pub mod model;

pub use model::{OperatorSession, SessionStatus};
