//! Unified error handling at the HTTP boundary.
//!
//! Provides a unified `AppError` type that maps domain outcomes to response
//! codes and JSON bodies. All route handlers return `Result<T, AppError>`.
//! Server-side failures are logged; clients only ever see a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::{PlaceOrderError, RepositoryError};
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Request failed validation; carries all collected messages.
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    /// Malformed request parameter.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found (or not owned by the requesting user).
    #[error("Not found")]
    NotFound,

    /// User is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PlaceOrderError> for AppError {
    fn from(e: PlaceOrderError) -> Self {
        match e {
            PlaceOrderError::Rejected(errors) => Self::Validation(errors),
            PlaceOrderError::Repository(e) => Self::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with full detail; the client gets a generic body
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let (status, body) = match &self {
            Self::Database(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"message": "Internal Server Error"}),
            ),
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"message": "Validation Failed", "errors": errors}),
            ),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({"message": message})),
            Self::NotFound => (StatusCode::NOT_FOUND, json!({"message": "Not Found"})),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, json!({"message": "Unauthorized"})),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidEmail(_) => (
                    StatusCode::UNAUTHORIZED,
                    json!({"message": "Invalid credentials"}),
                ),
                AuthError::UserAlreadyExists => (
                    StatusCode::CONFLICT,
                    json!({"message": "An account with this email already exists"}),
                ),
                AuthError::WeakPassword(msg) => {
                    (StatusCode::BAD_REQUEST, json!({"message": msg}))
                }
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    tracing::error!(error = %err, "Auth failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({"message": "Internal Server Error"}),
                    )
                }
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::BadRequest("Invalid page parameter".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Validation(vec!["x is out of stock".into()])),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_place_order_rejection_maps_to_validation() {
        let err: AppError =
            PlaceOrderError::Rejected(vec!["Apple is out of stock".to_string()]).into();
        assert!(matches!(err, AppError::Validation(ref errors) if errors.len() == 1));
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_auth_invalid_credentials_is_unauthorized() {
        let err = AppError::Auth(AuthError::InvalidCredentials);
        assert_eq!(get_status(err), StatusCode::UNAUTHORIZED);
    }
}
