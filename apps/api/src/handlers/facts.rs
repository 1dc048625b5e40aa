use axum::Json;
use axum::extract::{Extension, Path, State};

use factacl_application::GrantFactAccessInput;
use factacl_core::{AppError, CallerIdentity, SubjectId};
use factacl_domain::FactId;

use crate::dto::AclEntryResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn grant_fact_access_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path((fact_id, subject_id)): Path<(String, String)>,
) -> ApiResult<Json<AclEntryResponse>> {
    let fact_id = parse_fact_id(fact_id.as_str())?;
    let subject_id = SubjectId::parse(subject_id.as_str())?;

    let entry = state
        .access_grant_service
        .grant_access(
            &caller,
            GrantFactAccessInput {
                fact_id,
                subject_id,
            },
        )
        .await?;

    Ok(Json(AclEntryResponse::from(entry)))
}

pub async fn list_fact_access_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(fact_id): Path<String>,
) -> ApiResult<Json<Vec<AclEntryResponse>>> {
    let fact_id = parse_fact_id(fact_id.as_str())?;

    let entries = state
        .access_grant_service
        .list_fact_access(&caller, fact_id)
        .await?
        .into_iter()
        .map(AclEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

// A fact id that cannot name any stored Fact is reported as a missing Fact.
fn parse_fact_id(value: &str) -> Result<FactId, AppError> {
    FactId::parse(value).map_err(|_| AppError::NotFound(format!("fact '{value}' does not exist")))
}
