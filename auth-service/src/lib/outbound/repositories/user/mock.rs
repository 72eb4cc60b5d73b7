use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// In-memory user store for development and tests.
///
/// Contents are lost on restart.
#[derive(Default)]
pub struct MockUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        let key = user.username.as_str().to_string();
        if users.contains_key(&key) {
            return Err(UserError::DuplicateUsername(key));
        }

        users.insert(key, user.clone());
        tracing::debug!(username = %user.username, backend = "mock", "User stored");
        Ok(user)
    }

    async fn get_by_username(&self, username: &Username) -> Result<User, UserError> {
        self.users
            .read()
            .await
            .get(username.as_str())
            .cloned()
            .ok_or_else(|| UserError::NotFound(username.to_string()))
    }

    async fn get_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        // Emails are not unique; the earliest registration wins.
        self.users
            .read()
            .await
            .values()
            .filter(|user| user.email == *email)
            .min_by_key(|user| user.created_at)
            .cloned()
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.username.as_str().cmp(b.username.as_str()))
        });
        Ok(users)
    }
}
