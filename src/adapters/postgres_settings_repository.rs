//! Postgres implementation of SettingsRepository.
//!
//! The record lives in a single-row `site_settings` table as JSONB.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::SiteSettings;
use crate::ports::{RepositoryError, RepositoryResult, SettingsRepository};

#[derive(Clone)]
pub struct PostgresSettingsRepository {
    pool: PgPool,
}

impl PostgresSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PostgresSettingsRepository {
    async fn current(&self) -> RepositoryResult<Option<SiteSettings>> {
        let payload: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT payload FROM site_settings WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        payload.map(decode).transpose()
    }

    async fn save(&self, settings: &SiteSettings) -> RepositoryResult<SiteSettings> {
        let payload = serde_json::to_value(settings)
            .map_err(|e| RepositoryError::Malformed(e.to_string()))?;

        let stored: serde_json::Value = sqlx::query_scalar(
            r#"
            INSERT INTO site_settings (id, payload, updated_at)
            VALUES (1, $1, NOW())
            ON CONFLICT (id) DO UPDATE SET payload = EXCLUDED.payload, updated_at = NOW()
            RETURNING payload
            "#,
        )
        .bind(payload)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Site settings overwritten");
        decode(stored)
    }
}

fn decode(payload: serde_json::Value) -> RepositoryResult<SiteSettings> {
    serde_json::from_value(payload).map_err(|e| RepositoryError::Malformed(e.to_string()))
}
