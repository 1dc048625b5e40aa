use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use factacl_application::FactLookup;
use factacl_core::{AppError, AppResult, OrganizationId};
use factacl_domain::{AccessMode, Fact, FactId};


/// PostgreSQL-backed read-only Fact lookup.
#[derive(Clone)]
pub struct PostgresFactRepository {
    pool: PgPool,
}

impl PostgresFactRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FactRow {
    id: Uuid,
    organization_id: Uuid,
    access_mode: String,
}

#[async_trait]
impl FactLookup for PostgresFactRepository {
    async fn fetch_fact(&self, fact_id: FactId) -> AppResult<Fact> {
        let row = sqlx::query_as::<_, FactRow>(
            r#"
            SELECT id, organization_id, access_mode
            FROM facts
            WHERE id = $1
            "#,
        )
        .bind(fact_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load fact '{fact_id}': {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("fact '{fact_id}' does not exist")))?;

        let access_mode = AccessMode::from_str(row.access_mode.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode access mode '{}' for fact '{fact_id}': {error}",
                row.access_mode
            ))
        })?;

        Ok(Fact::new(
            FactId::from_uuid(row.id),
            access_mode,
            OrganizationId::from_uuid(row.organization_id),
        ))
    }
}
