use serde::{Deserialize, Serialize};

use crate::SubjectId;

/// Authenticated caller as asserted by the authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    subject_id: SubjectId,
}

impl CallerIdentity {
    /// Creates a caller identity for an authenticated subject.
    #[must_use]
    pub fn new(subject_id: SubjectId) -> Self {
        Self { subject_id }
    }

    /// Returns the subject id of the caller, recorded as grantor on new entries.
    #[must_use]
    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }
}
