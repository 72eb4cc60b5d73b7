use thiserror::Error;

/// Error type for session token parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionTokenError {
    #[error("Session token is empty")]
    Empty,

    #[error("Session token contains invalid characters")]
    InvalidCharacters,
}
