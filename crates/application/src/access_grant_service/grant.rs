use chrono::Utc;
use factacl_core::{AppError, SubjectId, ValidationError};
use factacl_domain::Fact;
use tracing::{debug, error, info};

use super::*;

impl AccessGrantService {
    /// Grants a subject explicit read access to a Fact.
    ///
    /// Checks run in a fixed order: Fact existence, read access, the
    /// organization's grant capability, then the access mode. An existing
    /// entry for the pair is returned unchanged; otherwise one entry is
    /// written with the caller recorded as grantor.
    pub async fn grant_access(
        &self,
        actor: &CallerIdentity,
        input: GrantFactAccessInput,
    ) -> AppResult<AclEntry> {
        let fact = self.fact_lookup.fetch_fact(input.fact_id).await?;

        self.authorization
            .check_read_permission(actor, &fact)
            .await?;
        self.authorization
            .check_permission(actor, Permission::FactAccessGrant, fact.organization_id())
            .await?;

        if !fact.access_mode().accepts_explicit_grants() {
            return Err(AppError::invalid_argument(ValidationError::new(
                "Cannot grant explicit access to a public Fact.",
                "fact.is.public",
                "fact",
                input.fact_id.to_string(),
            )));
        }

        if let Some(existing) = self.find_existing_entry(&fact, input.subject_id).await? {
            debug!(
                fact_id = %fact.id(),
                subject_id = %input.subject_id,
                acl_entry_id = %existing.id(),
                "fact access already granted"
            );
            return Ok(existing);
        }

        self.save_new_entry(actor, &fact, input.subject_id).await
    }

    async fn find_existing_entry(
        &self,
        fact: &Fact,
        subject_id: SubjectId,
    ) -> AppResult<Option<AclEntry>> {
        let entries = self.acl_store.list_entries(fact.id()).await?;
        Ok(entries
            .into_iter()
            .find(|entry| entry.grants(fact.id(), subject_id)))
    }

    async fn save_new_entry(
        &self,
        actor: &CallerIdentity,
        fact: &Fact,
        subject_id: SubjectId,
    ) -> AppResult<AclEntry> {
        // TODO: verify the subject exists once a subject directory port is available.
        let candidate = AclEntry::new(fact.id(), subject_id, actor.subject_id(), Utc::now());
        let candidate_id = candidate.id();

        match self.acl_store.insert_if_absent(candidate).await {
            Ok(AclInsertOutcome::Created(entry)) => {
                info!(
                    fact_id = %entry.fact_id(),
                    subject_id = %entry.subject_id(),
                    source_id = %entry.source_id(),
                    acl_entry_id = %entry.id(),
                    "granted fact access"
                );
                Ok(entry)
            }
            Ok(AclInsertOutcome::Existing(entry)) => {
                debug!(
                    fact_id = %entry.fact_id(),
                    subject_id = %entry.subject_id(),
                    acl_entry_id = %entry.id(),
                    "concurrent grant stored the entry first"
                );
                Ok(entry)
            }
            Err(AppError::ImmutableViolation(detail)) => {
                error!(
                    fact_id = %fact.id(),
                    subject_id = %subject_id,
                    acl_entry_id = %candidate_id,
                    %detail,
                    "freshly generated acl entry id already exists"
                );
                Err(AppError::Integrity(format!(
                    "acl entry '{candidate_id}' for fact '{}' collided with an existing entry",
                    fact.id()
                )))
            }
            Err(error) => Err(error),
        }
    }
}
