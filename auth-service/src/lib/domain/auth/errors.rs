use thiserror::Error;

use crate::domain::session::errors::SessionError;
use crate::user::errors::UserError;

/// Request-level failures of the auth service.
///
/// All of these are recoverable: they fail the current request and leave
/// other requests untouched.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User store error: {0}")]
    UserStore(UserError),

    #[error("Session store error: {0}")]
    SessionStore(SessionError),

    #[error("Password hashing error: {0}")]
    Password(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateUsername(username) => AuthError::DuplicateUsername(username),
            UserError::NotFound(key) => AuthError::NotFound(key),
            other => AuthError::UserStore(other),
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        if err.is_missing() {
            AuthError::Unauthorized
        } else {
            AuthError::SessionStore(err)
        }
    }
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        match err {
            auth::PasswordError::Empty => AuthError::EmptyPassword,
            other => AuthError::Password(other.to_string()),
        }
    }
}
