use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use factacl_application::{AclInsertOutcome, AclStore};
use factacl_core::{AppError, AppResult, SubjectId};
use factacl_domain::{AclEntry, AclEntryId, FactId};


const PRIMARY_KEY_CONSTRAINT: &str = "fact_acl_entries_pkey";
const FACT_SUBJECT_CONSTRAINT: &str = "fact_acl_entries_fact_subject_key";

/// PostgreSQL-backed ACL store.
///
/// Pair uniqueness is enforced by the `fact_acl_entries_fact_subject_key`
/// constraint; conditional inserts use it as the conflict arbiter.
#[derive(Clone)]
pub struct PostgresAclStore {
    pool: PgPool,
}

impl PostgresAclStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_entry_for_pair(
        &self,
        fact_id: FactId,
        subject_id: SubjectId,
    ) -> AppResult<Option<AclEntry>> {
        let row = sqlx::query_as::<_, AclEntryRow>(
            r#"
            SELECT id, fact_id, subject_id, source_id, created_at
            FROM fact_acl_entries
            WHERE fact_id = $1
              AND subject_id = $2
            "#,
        )
        .bind(fact_id.as_uuid())
        .bind(subject_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load acl entry for fact '{fact_id}' and subject '{subject_id}': {error}"
            ))
        })?;

        Ok(row.map(AclEntryRow::into_entry))
    }
}

#[derive(Debug, FromRow)]
struct AclEntryRow {
    id: Uuid,
    fact_id: Uuid,
    subject_id: Uuid,
    source_id: Uuid,
    created_at: DateTime<Utc>,
}

impl AclEntryRow {
    fn into_entry(self) -> AclEntry {
        AclEntry::from_persisted(
            AclEntryId::from_uuid(self.id),
            FactId::from_uuid(self.fact_id),
            SubjectId::from_uuid(self.subject_id),
            SubjectId::from_uuid(self.source_id),
            self.created_at,
        )
    }
}

fn map_insert_error(error: sqlx::Error, entry: &AclEntry) -> AppError {
    if let sqlx::Error::Database(database_error) = &error {
        match (
            database_error.code().as_deref(),
            database_error.constraint(),
        ) {
            (Some("23505"), Some(PRIMARY_KEY_CONSTRAINT)) => {
                return AppError::ImmutableViolation(format!(
                    "acl entry '{}' already exists",
                    entry.id()
                ));
            }
            (Some("23505"), Some(FACT_SUBJECT_CONSTRAINT)) => {
                return AppError::Conflict(format!(
                    "fact '{}' already grants access to subject '{}'",
                    entry.fact_id(),
                    entry.subject_id()
                ));
            }
            (Some("23503"), _) => {
                return AppError::NotFound(format!("fact '{}' does not exist", entry.fact_id()));
            }
            _ => {}
        }
    }

    AppError::Internal(format!(
        "failed to insert acl entry for fact '{}': {error}",
        entry.fact_id()
    ))
}

#[async_trait]
impl AclStore for PostgresAclStore {
    async fn list_entries(&self, fact_id: FactId) -> AppResult<Vec<AclEntry>> {
        let rows = sqlx::query_as::<_, AclEntryRow>(
            r#"
            SELECT id, fact_id, subject_id, source_id, created_at
            FROM fact_acl_entries
            WHERE fact_id = $1
            "#,
        )
        .bind(fact_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list acl entries for '{fact_id}': {error}"))
        })?;

        Ok(rows.into_iter().map(AclEntryRow::into_entry).collect())
    }

    async fn insert(&self, entry: AclEntry) -> AppResult<AclEntry> {
        sqlx::query_as::<_, AclEntryRow>(
            r#"
            INSERT INTO fact_acl_entries (id, fact_id, subject_id, source_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, fact_id, subject_id, source_id, created_at
            "#,
        )
        .bind(entry.id().as_uuid())
        .bind(entry.fact_id().as_uuid())
        .bind(entry.subject_id().as_uuid())
        .bind(entry.source_id().as_uuid())
        .bind(entry.timestamp())
        .fetch_one(&self.pool)
        .await
        .map(AclEntryRow::into_entry)
        .map_err(|error| map_insert_error(error, &entry))
    }

    async fn insert_if_absent(&self, entry: AclEntry) -> AppResult<AclInsertOutcome> {
        let inserted = sqlx::query_as::<_, AclEntryRow>(
            r#"
            INSERT INTO fact_acl_entries (id, fact_id, subject_id, source_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT ON CONSTRAINT fact_acl_entries_fact_subject_key DO NOTHING
            RETURNING id, fact_id, subject_id, source_id, created_at
            "#,
        )
        .bind(entry.id().as_uuid())
        .bind(entry.fact_id().as_uuid())
        .bind(entry.subject_id().as_uuid())
        .bind(entry.source_id().as_uuid())
        .bind(entry.timestamp())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_insert_error(error, &entry))?;

        if let Some(row) = inserted {
            return Ok(AclInsertOutcome::Created(row.into_entry()));
        }

        match self
            .find_entry_for_pair(entry.fact_id(), entry.subject_id())
            .await?
        {
            // The pair arbiter wins over the primary key, so a resubmitted entry lands here.
            Some(existing) if existing.id() == entry.id() => {
                Err(AppError::ImmutableViolation(format!(
                    "acl entry '{}' already exists",
                    entry.id()
                )))
            }
            Some(existing) => Ok(AclInsertOutcome::Existing(existing)),
            None => {
                warn!(
                    fact_id = %entry.fact_id(),
                    subject_id = %entry.subject_id(),
                    "conditional acl insert skipped but no entry exists for the pair"
                );
                Err(AppError::Internal(format!(
                    "acl entry for fact '{}' and subject '{}' vanished after conflict",
                    entry.fact_id(),
                    entry.subject_id()
                )))
            }
        }
    }
}
