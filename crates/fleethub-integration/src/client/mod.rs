//! HTTP client for the external fuel-backend system.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod retry;

pub use config::FuelBackendConfig;
pub use error::FuelBackendError;
pub use http::FuelBackendClient;
pub use models::{
    BackendHealth, BackendStatus, ExternalFuelTransaction, ReportTransactionRequest,
    TransactionsPage, VerifyAuthorizationResponse,
};
pub use retry::RetryPolicy;
