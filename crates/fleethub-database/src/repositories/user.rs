//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use fleethub_core::error::{AppError, ErrorKind};
use fleethub_core::result::AppResult;
use fleethub_entity::user::User;

/// Repository for user lookups.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// Find the organisation's default operator: the earliest-created
    /// active user. Attached by the sync engine when an external
    /// transaction cannot be matched to a requesting operator.
    pub async fn find_default_operator(&self, organisation_id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE organisation_id = $1 AND is_active = TRUE \
             ORDER BY created_at ASC LIMIT 1",
        )
        .bind(organisation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find default operator", e)
        })
    }
}
