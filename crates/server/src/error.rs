//! API error type and response mapping.
//!
//! Route handlers return `Result<T, ApiError>`. Note what is *not* here:
//! persistent-backend failures never become API errors - the storage facade
//! logs and masks them, so the only user-visible errors are not-found and
//! validation failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Requested entity does not exist. Carries the entity kind for the
    /// response message, e.g. `NotFound("Customer")` -> "Customer not found".
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed or invalid request payload.
    #[error("{0}")]
    BadRequest(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request error");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("Customer");
        assert_eq!(err.to_string(), "Customer not found");

        let err = ApiError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "invalid input");
    }

    #[test]
    fn test_api_error_status_codes() {
        fn get_status(err: ApiError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(get_status(ApiError::NotFound("Product")), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(ApiError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ApiError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
