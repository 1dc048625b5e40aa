use factacl_core::AppError;

use super::*;

impl AuthorizationService {
    /// Ensures a subject has the required permission in the organization scope.
    pub async fn require_permission(
        &self,
        organization_id: OrganizationId,
        subject_id: SubjectId,
        permission: Permission,
    ) -> AppResult<()> {
        if self
            .has_permission(organization_id, subject_id, permission)
            .await?
        {
            return Ok(());
        }

        Err(AppError::AccessDenied(format!(
            "subject '{subject_id}' is missing permission '{}' in organization '{organization_id}'",
            permission.as_str()
        )))
    }

    /// Returns whether the subject currently has the permission.
    pub async fn has_permission(
        &self,
        organization_id: OrganizationId,
        subject_id: SubjectId,
        permission: Permission,
    ) -> AppResult<bool> {
        let permissions = self
            .repository
            .list_permissions_for_subject(organization_id, subject_id)
            .await?;

        Ok(permissions.iter().any(|value| value == &permission))
    }
}
