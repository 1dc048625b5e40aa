use std::str::FromStr;

use async_trait::async_trait;
use factacl_application::AuthorizationRepository;
use factacl_core::{AppError, AppResult, OrganizationId, SubjectId};
use factacl_domain::Permission;
use sqlx::PgPool;


/// Resolves organization capabilities through RBAC role assignments.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn list_permissions_for_subject(
        &self,
        organization_id: OrganizationId,
        subject_id: SubjectId,
    ) -> AppResult<Vec<Permission>> {
        let codes = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT role_grants.permission
            FROM rbac_subject_roles AS assignments
            JOIN rbac_role_grants AS role_grants USING (role_id)
            WHERE assignments.organization_id = $1
              AND assignments.subject_id = $2
            "#,
        )
        .bind(organization_id.as_uuid())
        .bind(subject_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to resolve capabilities of subject '{subject_id}': {error}"
            ))
        })?;

        codes
            .iter()
            .map(|code| {
                Permission::from_str(code).map_err(|error| {
                    AppError::Internal(format!("stored capability '{code}' is unknown: {error}"))
                })
            })
            .collect()
    }
}
