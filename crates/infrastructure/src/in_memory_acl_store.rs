use std::collections::HashMap;

use async_trait::async_trait;
use factacl_application::{AclInsertOutcome, AclStore};
use factacl_core::{AppError, AppResult, SubjectId};
use factacl_domain::{AclEntry, AclEntryId, FactId};
use tokio::sync::RwLock;


#[derive(Debug, Default)]
struct AclState {
    entries: HashMap<AclEntryId, AclEntry>,
    by_pair: HashMap<(FactId, SubjectId), AclEntryId>,
}

/// In-memory ACL store.
///
/// Pair uniqueness is enforced under a single write lock, so concurrent
/// conditional inserts for the same pair store at most one entry.
#[derive(Debug, Default)]
pub struct InMemoryAclStore {
    state: RwLock<AclState>,
}

impl InMemoryAclStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AclStore for InMemoryAclStore {
    async fn list_entries(&self, fact_id: FactId) -> AppResult<Vec<AclEntry>> {
        let state = self.state.read().await;

        Ok(state
            .entries
            .values()
            .filter(|entry| entry.fact_id() == fact_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, entry: AclEntry) -> AppResult<AclEntry> {
        match self.insert_if_absent(entry).await? {
            AclInsertOutcome::Created(entry) => Ok(entry),
            AclInsertOutcome::Existing(existing) => Err(AppError::Conflict(format!(
                "fact '{}' already grants access to subject '{}'",
                existing.fact_id(),
                existing.subject_id()
            ))),
        }
    }

    async fn insert_if_absent(&self, entry: AclEntry) -> AppResult<AclInsertOutcome> {
        let mut state = self.state.write().await;

        // Identifier reuse is checked first, even for an entry of a known pair.
        if state.entries.contains_key(&entry.id()) {
            return Err(AppError::ImmutableViolation(format!(
                "acl entry '{}' already exists",
                entry.id()
            )));
        }

        let pair = (entry.fact_id(), entry.subject_id());
        if let Some(existing_id) = state.by_pair.get(&pair) {
            let existing = state.entries.get(existing_id).cloned().ok_or_else(|| {
                AppError::Internal(format!(
                    "acl pair index points at missing entry '{existing_id}'"
                ))
            })?;
            return Ok(AclInsertOutcome::Existing(existing));
        }

        state.by_pair.insert(pair, entry.id());
        state.entries.insert(entry.id(), entry.clone());
        Ok(AclInsertOutcome::Created(entry))
    }
}
