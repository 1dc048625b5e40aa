//! Shared primitives for all Rust crates in Factacl.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use auth::CallerIdentity;

/// Result type used across Factacl crates.
pub type AppResult<T> = Result<T, AppError>;

/// Organization identifier scoping capabilities and owned Facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganizationId(Uuid);

impl OrganizationId {
    /// Creates a random organization identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an organization identifier from an existing UUID value.
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

impl Default for OrganizationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OrganizationId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a subject: a grantee in an ACL entry or an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(Uuid);

impl SubjectId {
    /// Creates a random subject identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a subject identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a transport value into a subject identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid subject id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SubjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SubjectId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One structured business-rule violation attached to an invalid request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable description.
    pub message: String,
    /// Stable machine-readable code, e.g. `fact.is.public`.
    pub code: String,
    /// Name of the offending request property.
    pub property: String,
    /// Offending value as supplied by the caller.
    pub value: String,
}

impl ValidationError {
    /// Creates a validation error for one request property.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        code: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Request violates a business rule.
    #[error("invalid argument: {}", describe_validation_errors(.0))]
    InvalidArgument(Vec<ValidationError>),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller identity is missing or could not be verified.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Caller is authenticated but blocked by authorization policy.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Store refused to overwrite an immutable record with the same identifier.
    #[error("immutable violation: {0}")]
    ImmutableViolation(String),

    /// Internal consistency broke down; never retried.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an invalid-argument error carrying a single validation error.
    #[must_use]
    pub fn invalid_argument(error: ValidationError) -> Self {
        Self::InvalidArgument(vec![error])
    }
}

fn describe_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|error| format!("{} ({})", error.message, error.code))
        .collect::<Vec<_>>()
        .join("; ")
}
