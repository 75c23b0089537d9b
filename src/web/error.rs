use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::directory::DirectoryError;
use crate::profile::FieldError;

/// JSON API error
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Validation(Vec<FieldError>),
    Upstream(DirectoryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream(error) => directory_status(error),
        }
    }
}

/// HTTP status to answer with when the directory call failed
pub fn directory_status(error: &DirectoryError) -> StatusCode {
    match error {
        DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
        DirectoryError::Rejected { status, .. } if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl From<DirectoryError> for ApiError {
    fn from(error: DirectoryError) -> Self {
        match error {
            DirectoryError::NotFound(resource) => ApiError::NotFound(resource),
            other => ApiError::Upstream(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::NotFound(resource) => (
                status,
                Json(json!({
                    "error": "Not found",
                    "message": format!("{} not found", resource),
                    "code": "NOT_FOUND"
                })),
            )
                .into_response(),

            ApiError::BadRequest(msg) => (
                status,
                Json(json!({
                    "error": "Bad request",
                    "message": msg,
                    "code": "BAD_REQUEST"
                })),
            )
                .into_response(),

            ApiError::Validation(errors) => (
                status,
                Json(json!({
                    "error": "Validation failed",
                    "message": "One or more fields are invalid",
                    "code": "VALIDATION_FAILED",
                    "fields": errors
                })),
            )
                .into_response(),

            ApiError::Upstream(error) => {
                tracing::error!(error = %error, "Directory request failed");
                (
                    status,
                    Json(json!({
                        "error": "Directory error",
                        "message": error
                            .server_description()
                            .map(str::to_string)
                            .unwrap_or_else(|| error.to_string()),
                        "code": "DIRECTORY_ERROR"
                    })),
                )
                    .into_response()
            }
        }
    }
}
