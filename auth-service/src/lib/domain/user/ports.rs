use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

/// Persistence operations for registered users.
///
/// Implemented by every user store backend. All variants report the same
/// error kinds for the same situations.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Prepare the backend for use (schema creation, migrations).
    ///
    /// Called once at startup. Backends without setup keep the default.
    ///
    /// # Errors
    /// * `Database` - Backend could not be prepared
    async fn initialize(&self) -> Result<(), UserError> {
        Ok(())
    }

    /// Persist a new user.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `Database` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve a user by username.
    ///
    /// # Errors
    /// * `NotFound` - No user with this username
    /// * `Database` - Database operation failed
    async fn get_by_username(&self, username: &Username) -> Result<User, UserError>;

    /// Retrieve a user by email address.
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    /// * `Database` - Database operation failed
    async fn get_by_email(&self, email: &EmailAddress) -> Result<User, UserError>;

    /// Retrieve all users.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;
}
