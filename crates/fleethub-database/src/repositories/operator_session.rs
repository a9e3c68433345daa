//! Operator session repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use fleethub_core::error::{AppError, ErrorKind};
use fleethub_core::result::AppResult;
use fleethub_entity::session::OperatorSession;

/// Repository for operator session lookups.
#[derive(Debug, Clone)]
pub struct OperatorSessionRepository {
    pool: PgPool,
}

impl OperatorSessionRepository {
    /// Create a new operator session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<OperatorSession>> {
        sqlx::query_as::<_, OperatorSession>("SELECT * FROM operator_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find operator session", e)
            })
    }
}
