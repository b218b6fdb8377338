//! Authentication error types.
//!
//! A missing credential and an invalid one are distinct failures and map to
//! distinct statuses (403 vs 401).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::gateway::types::ErrorBody;

/// Authentication error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    /// No Authorization header on the request
    MissingToken,
    /// Token failed to parse, verify, or carry a principal
    InvalidToken,
}

impl AuthErrorCode {
    /// Get error name string.
    pub fn name(self) -> &'static str {
        match self {
            Self::MissingToken => "AUTH_MISSING",
            Self::InvalidToken => "AUTH_INVALID",
        }
    }

    /// Get HTTP status code.
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::MissingToken => StatusCode::FORBIDDEN,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Authentication error with message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl AuthError {
    /// Create a new auth error.
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create error with default message.
    pub fn from_code(code: AuthErrorCode) -> Self {
        let message = match code {
            AuthErrorCode::MissingToken => "No token provided",
            AuthErrorCode::InvalidToken => "Invalid token",
        };
        Self::new(code, message)
    }

    pub fn missing() -> Self {
        Self::from_code(AuthErrorCode::MissingToken)
    }

    pub fn invalid() -> Self {
        Self::from_code(AuthErrorCode::InvalidToken)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody::new(self.code.name(), self.message);
        (self.code.http_status(), Json(body)).into_response()
    }
}
