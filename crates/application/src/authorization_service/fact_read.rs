use factacl_core::AppError;
use factacl_domain::AccessMode;

use super::*;

impl AuthorizationService {
    /// Ensures a subject may read the Fact under its access mode.
    ///
    /// Public Facts need `fact.view` in the owning organization. Role-based
    /// Facts accept either `fact.view` or an explicit ACL entry. Explicit
    /// Facts accept only an ACL entry.
    pub async fn require_fact_read(&self, subject_id: SubjectId, fact: &Fact) -> AppResult<()> {
        let allowed = match fact.access_mode() {
            AccessMode::Public => {
                self.has_permission(fact.organization_id(), subject_id, Permission::FactView)
                    .await?
            }
            AccessMode::RoleBased => {
                self.has_permission(fact.organization_id(), subject_id, Permission::FactView)
                    .await?
                    || self.holds_acl_entry(subject_id, fact).await?
            }
            AccessMode::Explicit => self.holds_acl_entry(subject_id, fact).await?,
        };

        if allowed {
            return Ok(());
        }

        Err(AppError::AccessDenied(format!(
            "subject '{subject_id}' is not allowed to read fact '{}'",
            fact.id()
        )))
    }

    async fn holds_acl_entry(&self, subject_id: SubjectId, fact: &Fact) -> AppResult<bool> {
        let entries = self.acl_store.list_entries(fact.id()).await?;
        Ok(entries
            .iter()
            .any(|entry| entry.grants(fact.id(), subject_id)))
    }
}
