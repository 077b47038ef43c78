//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input (empty username, bad JSON, ...)
    #[error("{0}")]
    Validation(String),

    /// Username already registered
    #[error("Username already exists")]
    DuplicateUser,

    /// Unknown user or wrong password. One message for both.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Stored password hash could not be parsed
    #[error("Stored credential is corrupt")]
    CorruptCredential,

    /// No bearer token on a protected request
    #[error("Authentication token is missing")]
    MissingToken,

    /// Token failed structural or signature checks
    #[error("Invalid authentication token")]
    InvalidToken,

    /// Token signature is valid but its lifetime is over
    #[error("Authentication token has expired")]
    ExpiredToken,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::DuplicateUser => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::CorruptCredential
            | AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::DuplicateUser => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::CorruptCredential
            | AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken => ErrorKind::Unauthorized,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Whether this is a bearer-token rejection (answered with `WWW-Authenticate`)
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken
        )
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            // A corrupt record must look exactly like a wrong password
            AuthError::CorruptCredential => AuthError::InvalidCredentials.to_app_error(),
            AuthError::Validation(msg) => AppError::bad_request(msg.clone()),
            AuthError::DuplicateUser => {
                AppError::conflict(self.to_string()).with_action("Choose a different username")
            }
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken => AppError::unauthorized(self.to_string()),
            AuthError::Database(_) | AuthError::Internal(_) => AppError::internal(self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::CorruptCredential => {
                tracing::error!("Corrupt stored credential encountered");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Rejected invalid bearer token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let is_token_error = self.is_token_error();
        let mut response = self.to_app_error().into_response();
        if is_token_error {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        match err {
            platform::password::PasswordHashError::InvalidHashFormat => {
                AuthError::CorruptCredential
            }
            platform::password::PasswordHashError::HashingFailed(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<platform::bearer::BearerError> for AuthError {
    fn from(err: platform::bearer::BearerError) -> Self {
        match err {
            platform::bearer::BearerError::Missing => AuthError::MissingToken,
            platform::bearer::BearerError::Malformed => AuthError::InvalidToken,
        }
    }
}
