use std::sync::Arc;

use factacl_core::{AppResult, CallerIdentity};
use factacl_domain::{AclEntry, FactId, Permission};

use crate::{AclInsertOutcome, AclStore, AuthorizationChecker, FactLookup, GrantFactAccessInput};

mod grant;
mod listing;

#[cfg(test)]
mod tests;

/// Application service granting subjects explicit read access to Facts.
#[derive(Clone)]
pub struct AccessGrantService {
    fact_lookup: Arc<dyn FactLookup>,
    authorization: Arc<dyn AuthorizationChecker>,
    acl_store: Arc<dyn AclStore>,
}

impl AccessGrantService {
    /// Creates a new access grant service from its collaborators.
    #[must_use]
    pub fn new(
        fact_lookup: Arc<dyn FactLookup>,
        authorization: Arc<dyn AuthorizationChecker>,
        acl_store: Arc<dyn AclStore>,
    ) -> Self {
        Self {
            fact_lookup,
            authorization,
            acl_store,
        }
    }
}
