//! Unified error handling for the storefront.
//!
//! Handlers return `Result<T, AppError>`. Recoverable backend failures
//! are usually caught at the call site and rendered as a flash banner;
//! `AppError` is the fallback for everything propagated with `?`.
//! Fatal conditions (missing record, corrupt or absent session state)
//! redirect to a safe route rather than rendering an error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::api::ApiError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API operation failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Session read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Api(ApiError::NotFound(_)) | Self::NotFound(_) => {
                tracing::warn!(error = %self, "Resource not found, redirecting home");
                Redirect::to("/").into_response()
            }
            Self::Unauthorized => Redirect::to("/auth/login").into_response(),
            Self::Session(_) => {
                tracing::warn!(error = %self, "Session unusable, redirecting to login");
                Redirect::to("/auth/login").into_response()
            }
            Self::Api(_) => {
                tracing::error!(error = %self, "Backend request failed");
                (StatusCode::BAD_GATEWAY, "External service error").into_response()
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()).into_response(),
            Self::Internal(_) => {
                tracing::error!(error = %self, "Request error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("producto 123".to_string());
        assert_eq!(err.to_string(), "Not found: producto 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_not_found_redirects_home() {
        let response = AppError::NotFound("x".to_string()).into_response();
        assert!(response.status().is_redirection());
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/")
        );
    }

    #[test]
    fn test_unauthorized_redirects_to_login() {
        let response = AppError::Unauthorized.into_response();
        assert!(response.status().is_redirection());
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/auth/login")
        );
    }

    #[test]
    fn test_bad_request_status() {
        let response = AppError::BadRequest("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
