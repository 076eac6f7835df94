//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` so every failure leaves the server as a
//! `{"detail": "<message>"}` JSON body with the matching status code.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use devreg_storage::StorageError;

/// Message returned whenever a device id has no stored record.
pub const DEVICE_NOT_FOUND: &str = "Device not found";

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Human-readable error message.
    pub detail: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Malformed request: bad JSON, wrong content type (400).
    #[error("{0}")]
    BadRequest(String),

    /// Well-formed JSON with the wrong shape or values (422).
    #[error("{0}")]
    ValidationFailed(String),

    /// The key-value store could not be reached (503).
    #[error("{0}")]
    StoreUnavailable(String),

    /// Internal server error (500).
    #[error("{0}")]
    InternalError(String),
}

impl ApiError {
    pub fn device_not_found() -> Self {
        ApiError::NotFound(DEVICE_NOT_FOUND.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        }

        let body = ApiErrorDetail {
            detail: self.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::Unavailable(_) => ApiError::StoreUnavailable(err.to_string()),
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::ValidationFailed(rejection.body_text()),
            _ => ApiError::BadRequest(rejection.body_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_5xx() {
        let unavailable: ApiError = StorageError::Unavailable("connection refused".into()).into();
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let backend: ApiError = StorageError::Backend("WRONGTYPE".into()).into();
        assert_eq!(backend.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_uses_fixed_message() {
        let err = ApiError::device_not_found();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Device not found");
    }
}
