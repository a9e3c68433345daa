//! Fuel authorization and transaction entities.

pub mod authorization;
pub mod discrepancy;
pub mod status;
pub mod transaction;

pub use authorization::{CreateFuelAuthorization, FuelAuthorization};
pub use discrepancy::{DiscrepancyDetails, DiscrepancyType};
pub use status::AuthorizationStatus;
pub use transaction::{CreateFuelTransaction, FuelTransaction, TransactionSource};
