//! HTTP error mapping for API handlers.

use crate::AppError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// An [`AppError`] bound to the HTTP status it is reported with.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    error: AppError,
}

impl HttpError {
    /// Map an error the way the toggle-favorite route does: store failures are
    /// reported as `400 Bad Request` instead of `500`.
    pub fn store_failure_as_bad_request(error: AppError) -> Self {
        let mut mapped = Self::from(error);
        if mapped.error.is_store_error() {
            mapped.status = StatusCode::BAD_REQUEST;
        }
        mapped
    }

    /// Status code this error will be rendered with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<AppError> for HttpError {
    fn from(error: AppError) -> Self {
        let status = match &error {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Storage(_) | AppError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self { status, error }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let message = match self.error {
            AppError::Validation(message) => message,
            AppError::NotFound => AppError::NotFound.to_string(),
            other => {
                tracing::error!("Store failure ({}): {}", self.status, other);
                "Database error".to_string()
            }
        };
        (self.status, Json(json!({ "error": message }))).into_response()
    }
}
