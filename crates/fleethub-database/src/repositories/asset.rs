//! Asset repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use fleethub_core::error::{AppError, ErrorKind};
use fleethub_core::result::AppResult;
use fleethub_entity::asset::Asset;

/// Repository for asset lookups and meter updates.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    /// Create a new asset repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an asset by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Asset>> {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find asset", e))
    }

    /// Find an asset by registration plate (case-insensitive).
    pub async fn find_by_registration_plate(
        &self,
        organisation_id: Uuid,
        plate: &str,
    ) -> AppResult<Option<Asset>> {
        sqlx::query_as::<_, Asset>(
            "SELECT * FROM assets WHERE organisation_id = $1 AND UPPER(registration_plate) = UPPER($2)",
        )
        .bind(organisation_id)
        .bind(plate)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find asset by plate", e)
        })
    }

    /// Find an asset by its fleet-internal asset number (case-insensitive).
    pub async fn find_by_asset_number(
        &self,
        organisation_id: Uuid,
        asset_number: &str,
    ) -> AppResult<Option<Asset>> {
        sqlx::query_as::<_, Asset>(
            "SELECT * FROM assets WHERE organisation_id = $1 AND UPPER(asset_number) = UPPER($2)",
        )
        .bind(organisation_id)
        .bind(asset_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find asset by number", e)
        })
    }
}
