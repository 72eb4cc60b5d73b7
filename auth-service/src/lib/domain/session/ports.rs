use std::time::Duration;

use async_trait::async_trait;
use auth::SessionToken;

use crate::domain::session::errors::SessionError;
use crate::domain::user::models::UserId;

/// Storage for sign-in sessions.
///
/// The store owns the whole session lifecycle: token minting, expiry and
/// removal.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Prepare the backend for use. Called once at startup.
    ///
    /// # Errors
    /// * `Backend` - Backend could not be prepared
    async fn initialize(&self) -> Result<(), SessionError> {
        Ok(())
    }

    /// Lifetime of sessions this store creates, as actually enforced.
    ///
    /// Issued cookies carry the same lifetime.
    fn ttl(&self) -> Duration;

    /// Start a session for a user.
    ///
    /// # Returns
    /// Freshly minted, unguessable session token
    ///
    /// # Errors
    /// * `Backend` - Storage operation failed
    async fn create(&self, user_id: &UserId) -> Result<SessionToken, SessionError>;

    /// Resolve a token to the user it was issued for.
    ///
    /// # Errors
    /// * `NotFound` - Token is unknown
    /// * `Expired` - Token was issued but its session has lapsed
    /// * `Backend` - Storage operation failed
    async fn get(&self, token: &SessionToken) -> Result<UserId, SessionError>;

    /// Remove a session. Removing an unknown token is not an error.
    ///
    /// # Errors
    /// * `Backend` - Storage operation failed
    async fn delete(&self, token: &SessionToken) -> Result<(), SessionError>;
}
