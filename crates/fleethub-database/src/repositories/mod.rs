//! Repository implementations for all FleetHub entities.

pub mod asset;
pub mod audit;
pub mod fuel_authorization;
pub mod fuel_transaction;
pub mod integration_health;
pub mod operator_session;
pub mod organisation;
pub mod sync_history;
pub mod user;

pub use asset::AssetRepository;
pub use audit::AuditLogRepository;
pub use fuel_authorization::FuelAuthorizationRepository;
pub use fuel_transaction::FuelTransactionRepository;
pub use integration_health::IntegrationHealthRepository;
pub use operator_session::OperatorSessionRepository;
pub use organisation::OrganisationRepository;
pub use sync_history::SyncHistoryRepository;
pub use user::UserRepository;
