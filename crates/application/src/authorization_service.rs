use std::sync::Arc;

use async_trait::async_trait;
use factacl_core::{AppResult, CallerIdentity, OrganizationId, SubjectId};
use factacl_domain::{Fact, Permission};

use crate::AclStore;

mod fact_read;
mod permissions;


/// Repository port for permission lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists effective permissions for a subject in an organization.
    async fn list_permissions_for_subject(
        &self,
        organization_id: OrganizationId,
        subject_id: SubjectId,
    ) -> AppResult<Vec<Permission>>;
}

/// Pass/fail authorization gates consumed by the access grant workflow.
///
/// Both checks fail with `AccessDenied` when the caller is not allowed, or
/// with `AuthenticationFailed` when the caller's identity is no longer valid.
#[async_trait]
pub trait AuthorizationChecker: Send + Sync {
    /// Ensures the caller may read the Fact.
    async fn check_read_permission(&self, actor: &CallerIdentity, fact: &Fact) -> AppResult<()>;

    /// Ensures the caller holds an organization-scoped capability.
    async fn check_permission(
        &self,
        actor: &CallerIdentity,
        permission: Permission,
        organization_id: OrganizationId,
    ) -> AppResult<()>;
}

/// Application service for organization-scoped and Fact-level authorization.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
    acl_store: Arc<dyn AclStore>,
}

impl AuthorizationService {
    /// Creates a new authorization service from its collaborators.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>, acl_store: Arc<dyn AclStore>) -> Self {
        Self {
            repository,
            acl_store,
        }
    }
}

#[async_trait]
impl AuthorizationChecker for AuthorizationService {
    async fn check_read_permission(&self, actor: &CallerIdentity, fact: &Fact) -> AppResult<()> {
        self.require_fact_read(actor.subject_id(), fact).await
    }

    async fn check_permission(
        &self,
        actor: &CallerIdentity,
        permission: Permission,
        organization_id: OrganizationId,
    ) -> AppResult<()> {
        self.require_permission(organization_id, actor.subject_id(), permission)
            .await
    }
}
