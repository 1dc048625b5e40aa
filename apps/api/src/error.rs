use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use factacl_core::AppError;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// One validation error in an API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/validation-error-response.ts"
)]
pub struct ValidationErrorResponse {
    pub message: String,
    pub code: String,
    pub property: String,
    pub value: String,
}

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
    errors: Vec<ValidationErrorResponse>,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) | AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::ImmutableViolation(_) | AppError::Integrity(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let payload = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed with internal error");
            ErrorResponse {
                message: "internal server error".to_owned(),
                errors: Vec::new(),
            }
        } else {
            let message = self.0.to_string();
            let errors = match self.0 {
                AppError::InvalidArgument(errors) => errors
                    .into_iter()
                    .map(|error| ValidationErrorResponse {
                        message: error.message,
                        code: error.code,
                        property: error.property,
                        value: error.value,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            ErrorResponse { message, errors }
        };

        (status, Json(payload)).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
