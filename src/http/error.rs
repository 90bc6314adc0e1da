//! HTTP error handling and response types.
//!
//! Every error category maps to a distinct status code: bad input is 400,
//! a token that doesn't resolve is 401, a resolved user that doesn't own
//! the target is 403, a missing schema is 404, and failures of the store or
//! of either external service are 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::db::repository::RepositoryError;
use crate::services::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request shape (e.g., missing bearer token)
    BadRequest(String),
    /// Service-layer failure
    Service(ServiceError),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Service(err) => map_service_error(err),
        };

        (status, Json(error)).into_response()
    }
}

fn map_service_error(err: ServiceError) -> (StatusCode, ApiError) {
    match err {
        ServiceError::InvalidArgument(msg) => {
            (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
        }
        ServiceError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", msg)),
        ServiceError::Auth(AuthError::Unauthorized { status, message }) => (
            StatusCode::UNAUTHORIZED,
            ApiError::new("UNAUTHORIZED", "Invalid token")
                .with_details(format!("upstream status {}: {}", status, message)),
        ),
        ServiceError::Auth(AuthError::Unavailable(msg)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("AUTH_GATEWAY_ERROR", msg),
        ),
        ServiceError::Repository(e) => match e {
            RepositoryError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", e.to_string()))
            }
            RepositoryError::InvalidArgument { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", e.to_string()))
            }
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("REPOSITORY_ERROR", other.to_string()),
            ),
        },
        ServiceError::Solutions(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("SOLUTIONS_ERROR", e.to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_the_taxonomy() {
        let cases = [
            (
                AppError::BadRequest("User token is required".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Service(ServiceError::InvalidArgument("no id".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Service(ServiceError::Auth(AuthError::Unauthorized {
                    status: 401,
                    message: "nope".into(),
                })),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Service(ServiceError::Auth(AuthError::Unavailable("down".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Service(ServiceError::Forbidden("not yours".into())),
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::Service(ServiceError::Repository(RepositoryError::not_found(
                    "schema 9",
                ))),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Service(ServiceError::Repository(RepositoryError::internal("boom"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
