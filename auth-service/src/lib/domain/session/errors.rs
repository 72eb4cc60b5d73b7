use thiserror::Error;

/// Error reported by every session store variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Session expired")]
    Expired,

    #[error("Session backend error: {0}")]
    Backend(String),
}

impl SessionError {
    /// Whether the error means the caller simply holds no live session.
    pub fn is_missing(&self) -> bool {
        matches!(self, SessionError::NotFound | SessionError::Expired)
    }
}
