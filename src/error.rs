use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::{FieldError, ValidationFailure};
use crate::store::StoreError;

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ApiError {
    error: String,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ValidationErrorBody {
    error: String,
    fields: Vec<FieldError>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("document store is not available")]
    StoreUnavailable,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

fn err(status: StatusCode, msg: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(failure) => {
                tracing::debug!(fields = ?failure.fields().collect::<Vec<_>>(), "Rejected payload");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ValidationErrorBody {
                        error: "Validation failed".to_string(),
                        fields: failure.errors,
                    }),
                )
                    .into_response()
            }
            AppError::InvalidBody(msg) => err(StatusCode::BAD_REQUEST, &msg),
            AppError::StoreUnavailable => {
                tracing::warn!("Request needs the document store but none is configured");
                err(StatusCode::SERVICE_UNAVAILABLE, "Database not available")
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
        }
    }
}
