//! Unified error handling for the admin panel.
//!
//! CRUD handlers catch backend failures themselves and turn them into
//! flash banners; `AppError` covers what propagates with `?` (session
//! failures, missing records, auth).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::api::ApiError;

/// Application-level error type for the admin panel.
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
                tracing::warn!(error = %self, "Record not found, redirecting to dashboard");
                Redirect::to("/").into_response()
            }
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
    fn test_not_found_redirects() {
        let response = AppError::NotFound("producto".to_string()).into_response();
        assert!(response.status().is_redirection());
    }

    #[test]
    fn test_api_error_maps_to_bad_gateway() {
        let err = AppError::Api(ApiError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
