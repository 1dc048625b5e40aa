use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use factacl_core::{AppError, CallerIdentity, SubjectId};

use crate::error::ApiResult;

/// Header carrying the caller subject id asserted by the authentication gateway.
pub const CALLER_ID_HEADER: &str = "x-caller-id";

pub async fn require_caller(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = caller_identity_from_request(&request)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn caller_identity_from_request(request: &Request) -> Result<CallerIdentity, AppError> {
    let subject_id = request
        .headers()
        .get(CALLER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::AuthenticationFailed("authentication required".to_owned()))?;
    let subject_id = SubjectId::parse(subject_id).map_err(|_| {
        AppError::AuthenticationFailed("caller identity is not a valid subject id".to_owned())
    })?;

    Ok(CallerIdentity::new(subject_id))
}
