//! Organisation repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use fleethub_core::error::{AppError, ErrorKind};
use fleethub_core::result::AppResult;
use fleethub_entity::organisation::Organisation;

/// Repository for organisation lookups.
#[derive(Debug, Clone)]
pub struct OrganisationRepository {
    pool: PgPool,
}

impl OrganisationRepository {
    /// Create a new organisation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an organisation by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organisation>> {
        sqlx::query_as::<_, Organisation>("SELECT * FROM organisations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find organisation", e)
            })
    }

    /// List all organisations.
    pub async fn find_all(&self) -> AppResult<Vec<Organisation>> {
        sqlx::query_as::<_, Organisation>("SELECT * FROM organisations ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list organisations", e)
            })
    }
}
