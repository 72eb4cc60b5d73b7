use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::CookieDeletion;
use crate::domain::auth::models::CookieSet;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::SignupCommand;
use crate::domain::user::models::UserProfile;

/// Port for authentication operations exposed to inbound adapters.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Errors
    /// * `PasswordMismatch` - The two passwords differ; nothing is stored
    /// * `EmptyPassword` - Password is empty
    /// * `DuplicateUsername` - Username is already taken
    /// * `UserStore` - User store operation failed
    async fn signup(&self, command: SignupCommand) -> Result<(), AuthError>;

    /// Verify credentials and open a session.
    ///
    /// # Returns
    /// Cookies to set on the client, holding exactly one session token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user or wrong password
    /// * `UserStore` / `SessionStore` - Backend operation failed
    async fn signin(&self, credentials: Credentials) -> Result<CookieSet, AuthError>;

    /// Close every session the given cookies resolve to.
    ///
    /// Never fails. The returned names always include the session cookie,
    /// so clients end up with clean cookie state even when they were not
    /// signed in.
    async fn signout(&self, cookies: &CookieSet) -> CookieDeletion;

    /// Look up a user on behalf of a signed-in caller.
    ///
    /// # Errors
    /// * `Unauthorized` - No live session behind the caller's cookies
    /// * `NotFound` - No user with this username
    /// * `UserStore` / `SessionStore` - Backend operation failed
    async fn get_user(&self, username: &str, cookies: &CookieSet)
        -> Result<UserProfile, AuthError>;

    /// List every registered user. Unauthenticated, for debugging.
    ///
    /// # Errors
    /// * `UserStore` - User store operation failed
    async fn list_users(&self) -> Result<Vec<UserProfile>, AuthError>;
}
