use chrono::SecondsFormat;
use factacl_domain::AclEntry;
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of one ACL entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/acl-entry-response.ts"
)]
pub struct AclEntryResponse {
    pub id: String,
    pub fact_id: String,
    pub subject_id: String,
    pub source_id: String,
    /// Creation timestamp in RFC3339 with millisecond precision.
    pub timestamp: String,
}

impl From<AclEntry> for AclEntryResponse {
    fn from(value: AclEntry) -> Self {
        Self {
            id: value.id().to_string(),
            fact_id: value.fact_id().to_string(),
            subject_id: value.subject_id().to_string(),
            source_id: value.source_id().to_string(),
            timestamp: value
                .timestamp()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
