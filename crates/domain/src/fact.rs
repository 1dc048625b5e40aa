use std::fmt::{Display, Formatter};
use std::str::FromStr;

use factacl_core::{AppError, AppResult, OrganizationId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a Fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactId(Uuid);

impl FactId {
    /// Creates a random Fact identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a Fact identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a transport value into a Fact identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid fact id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for FactId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for FactId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Visibility policy of a Fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Readable by everyone allowed to view Facts in the owning organization.
    Public,
    /// Readable through organization capabilities or explicit ACL entries.
    RoleBased,
    /// Readable only by subjects holding an explicit ACL entry.
    Explicit,
}

impl AccessMode {
    /// Returns a stable storage value for this access mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::RoleBased => "role_based",
            Self::Explicit => "explicit",
        }
    }

    /// Returns whether explicit ACL entries are meaningful for this mode.
    #[must_use]
    pub fn accepts_explicit_grants(&self) -> bool {
        !matches!(self, Self::Public)
    }
}

impl FromStr for AccessMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "public" => Ok(Self::Public),
            "role_based" => Ok(Self::RoleBased),
            "explicit" => Ok(Self::Explicit),
            _ => Err(AppError::Validation(format!(
                "unknown access mode value '{value}'"
            ))),
        }
    }
}

/// Read-only projection of a knowledge-graph Fact as seen by access control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    id: FactId,
    access_mode: AccessMode,
    organization_id: OrganizationId,
}

impl Fact {
    /// Creates a Fact projection.
    #[must_use]
    pub fn new(id: FactId, access_mode: AccessMode, organization_id: OrganizationId) -> Self {
        Self {
            id,
            access_mode,
            organization_id,
        }
    }

    /// Returns the Fact identifier.
    #[must_use]
    pub fn id(&self) -> FactId {
        self.id
    }

    /// Returns the Fact visibility policy.
    #[must_use]
    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// Returns the owning organization.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }
}
