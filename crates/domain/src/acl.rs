use std::fmt::{Display, Formatter};

use chrono::{DateTime, SubsecRound, Utc};
use factacl_core::SubjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::FactId;

/// Unique identifier of an ACL entry. Generated once and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AclEntryId(Uuid);

impl AclEntryId {
    /// Creates a random ACL entry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ACL entry identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AclEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AclEntryId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Immutable grant of read access on one Fact to one subject.
///
/// Entries expose no mutators; once persisted they are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    id: AclEntryId,
    fact_id: FactId,
    subject_id: SubjectId,
    source_id: SubjectId,
    timestamp: DateTime<Utc>,
}

impl AclEntry {
    /// Creates a new entry with a freshly generated identifier.
    ///
    /// The timestamp is truncated to millisecond precision so that stored and
    /// returned entries compare equal.
    #[must_use]
    pub fn new(
        fact_id: FactId,
        subject_id: SubjectId,
        source_id: SubjectId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AclEntryId::new(),
            fact_id,
            subject_id,
            source_id,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }

    /// Rehydrates an entry loaded from storage.
    #[must_use]
    pub fn from_persisted(
        id: AclEntryId,
        fact_id: FactId,
        subject_id: SubjectId,
        source_id: SubjectId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            fact_id,
            subject_id,
            source_id,
            timestamp,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub fn id(&self) -> AclEntryId {
        self.id
    }

    /// Returns the Fact this entry grants access to.
    #[must_use]
    pub fn fact_id(&self) -> FactId {
        self.fact_id
    }

    /// Returns the grantee.
    #[must_use]
    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    /// Returns the grantor.
    #[must_use]
    pub fn source_id(&self) -> SubjectId {
        self.source_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns whether this entry grants `subject_id` access to `fact_id`.
    #[must_use]
    pub fn grants(&self, fact_id: FactId, subject_id: SubjectId) -> bool {
        self.fact_id == fact_id && self.subject_id == subject_id
    }
}
