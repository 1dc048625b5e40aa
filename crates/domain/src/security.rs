use std::str::FromStr;

use factacl_core::AppError;
use serde::{Deserialize, Serialize};

/// Organization-scoped capabilities enforced by application policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows reading Facts owned by the organization.
    FactView,
    /// Allows granting explicit access to Facts owned by the organization.
    FactAccessGrant,
    /// Allows listing explicit access entries of Facts owned by the organization.
    FactAccessView,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FactView => "fact.view",
            Self::FactAccessGrant => "fact.access.grant",
            Self::FactAccessView => "fact.access.view",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::FactView,
            Permission::FactAccessGrant,
            Permission::FactAccessView,
        ];

        ALL
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fact.view" => Ok(Self::FactView),
            "fact.access.grant" => Ok(Self::FactAccessGrant),
            "fact.access.view" => Ok(Self::FactAccessView),
            _ => Err(AppError::Validation(format!(
                "unknown permission value '{value}'"
            ))),
        }
    }
}
