//! Error types for kura-reg
//!
//! Validation problems are reported to the caller verbatim. Server-side
//! failures are logged and answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kura_common::LocationError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing or rejected admin credential (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Method not supported on this route (405)
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Internal server error (500); the detail is logged, never returned
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<LocationError> for ApiError {
    fn from(err: LocationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<kura_common::Error> for ApiError {
    fn from(err: kura_common::Error) -> Self {
        use kura_common::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Duplicate(msg) | Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed".to_string(),
            ),
            ApiError::Internal(detail) => {
                error!("{}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_error_mapping() {
        assert!(matches!(
            ApiError::from(kura_common::Error::NotFound("x".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(kura_common::Error::Duplicate("x".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(kura_common::Error::CatalogUnavailable("x".into())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_location_error_message() {
        match ApiError::from(LocationError::InvalidWard) {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Invalid Ward for selected Constituency"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Internal("db down".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::MethodNotAllowed.into_response().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::Unauthorized("no".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
