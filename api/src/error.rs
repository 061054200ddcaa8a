//! Unified error types for the UPSTAC API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)
//!
//! `AppError`'s `IntoResponse` impl is the single error-to-status table of
//! the HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::TestRequestId;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// Unknown or non-positive test request id
    #[error("Invalid ID: {0}")]
    InvalidId(TestRequestId),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Another request with the same contact details is still in progress
    pub fn contact_in_use(existing: TestRequestId) -> Self {
        DomainError::AlreadyExists(format!(
            "A request with the same phone number or email is already in progress (id {})",
            existing
        ))
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,
}

/// Error response body for JSON responses
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::InvalidId(id)) => (
                StatusCode::NOT_FOUND,
                "Invalid ID",
                Some(format!("No test request with id {}", id)),
            ),
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                (StatusCode::CONFLICT, "Already exists", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "Forbidden", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden", None),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn invalid_id_message_mentions_invalid_id() {
        let err = AppError::from(DomainError::InvalidId(TestRequestId(-34)));
        assert!(err.to_string().contains("Invalid ID"));
        assert!(err.to_string().contains("-34"));
    }

    #[test]
    fn contact_in_use_is_a_conflict() {
        let err = DomainError::contact_in_use(TestRequestId(3));
        assert!(err.to_string().contains("already in progress"));
        assert_eq!(status_of(err.into()), StatusCode::CONFLICT);
    }

    #[test]
    fn error_status_table() {
        assert_eq!(
            status_of(DomainError::InvalidId(TestRequestId(7)).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::Validation("x".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::AlreadyExists("x".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::Forbidden("x".into()).into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(DomainError::Database("x".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::BadRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(DomainError::Internal("x".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
