use async_trait::async_trait;
use factacl_core::{AppResult, SubjectId};
use factacl_domain::{AclEntry, Fact, FactId};

/// Input payload for granting a subject access to a Fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantFactAccessInput {
    /// Fact receiving the grant.
    pub fact_id: FactId,
    /// Grantee. Existence of the subject is not verified.
    pub subject_id: SubjectId,
}

/// Result of an atomic insert keyed by `(fact_id, subject_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclInsertOutcome {
    /// The candidate entry was stored.
    Created(AclEntry),
    /// An entry for the same pair already existed and was left untouched.
    Existing(AclEntry),
}

impl AclInsertOutcome {
    /// Returns the entry now stored for the pair.
    #[must_use]
    pub fn into_entry(self) -> AclEntry {
        match self {
            Self::Created(entry) | Self::Existing(entry) => entry,
        }
    }
}

/// Port resolving Facts by identifier.
#[async_trait]
pub trait FactLookup: Send + Sync {
    /// Fetches a Fact, failing with `NotFound` when it does not exist.
    async fn fetch_fact(&self, fact_id: FactId) -> AppResult<Fact>;
}

/// Port for lookup and insertion of ACL entries.
///
/// Implementations must enforce uniqueness of `(fact_id, subject_id)`
/// themselves; callers never rely on lookup-then-insert alone.
#[async_trait]
pub trait AclStore: Send + Sync {
    /// Lists all entries of one Fact in no particular order.
    async fn list_entries(&self, fact_id: FactId) -> AppResult<Vec<AclEntry>>;

    /// Inserts a new entry.
    ///
    /// Fails with `ImmutableViolation` if the entry id exists and with
    /// `Conflict` if the `(fact_id, subject_id)` pair already has an entry.
    async fn insert(&self, entry: AclEntry) -> AppResult<AclEntry>;

    /// Atomically inserts the entry unless its `(fact_id, subject_id)` pair
    /// already has one, in which case the stored entry is returned.
    ///
    /// Fails with `ImmutableViolation` if the entry id exists.
    async fn insert_if_absent(&self, entry: AclEntry) -> AppResult<AclInsertOutcome>;
}
