use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::SessionToken;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::CookieDeletion;
use crate::domain::auth::models::CookieSet;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::SignupCommand;
use crate::domain::auth::models::DEFAULT_SESSION_COOKIE;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::session::errors::SessionError;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Auth service over runtime-selected stores.
pub type DynAuthService = AuthService<dyn UserRepository, dyn SessionRepository>;

/// Domain service implementation for authentication operations.
///
/// Holds no per-request state; users and sessions live in the injected
/// stores. Works over concrete stores as well as trait objects picked by
/// the backend registry.
pub struct AuthService<UR, SR>
where
    UR: UserRepository + ?Sized,
    SR: SessionRepository + ?Sized,
{
    user_repository: Arc<UR>,
    session_repository: Arc<SR>,
    authenticator: Authenticator,
    session_cookie: String,
}

impl<UR, SR> AuthService<UR, SR>
where
    UR: UserRepository + ?Sized,
    SR: SessionRepository + ?Sized,
{
    /// Create a new auth service with injected stores.
    ///
    /// # Arguments
    /// * `user_repository` - User store implementation
    /// * `session_repository` - Session store implementation
    ///
    /// # Returns
    /// Service issuing sessions under the default `session` cookie
    pub fn new(user_repository: Arc<UR>, session_repository: Arc<SR>) -> Self {
        Self {
            user_repository,
            session_repository,
            authenticator: Authenticator::new(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }

    /// Issue session tokens under a different cookie name.
    pub fn with_session_cookie(mut self, name: impl Into<String>) -> Self {
        self.session_cookie = name.into();
        self
    }

    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    /// Resolve the caller's session cookie to a user ID.
    async fn authenticate(&self, cookies: &CookieSet) -> Result<UserId, AuthError> {
        let value = cookies
            .get(&self.session_cookie)
            .ok_or(AuthError::Unauthorized)?;
        let token = SessionToken::parse(value.as_str()).map_err(|_| AuthError::Unauthorized)?;

        Ok(self.session_repository.get(&token).await?)
    }

    /// Find the user a sign-in attempt refers to: by username first, then by email.
    async fn find_signin_user(&self, username_or_email: &str) -> Result<Option<User>, AuthError> {
        if let Ok(username) = Username::new(username_or_email.to_string()) {
            match self.user_repository.get_by_username(&username).await {
                Ok(user) => return Ok(Some(user)),
                Err(UserError::NotFound(_)) => {}
                Err(e) => return Err(AuthError::UserStore(e)),
            }
        }

        if let Ok(email) = EmailAddress::new(username_or_email.to_string()) {
            match self.user_repository.get_by_email(&email).await {
                Ok(user) => return Ok(Some(user)),
                Err(UserError::NotFound(_)) => {}
                Err(e) => return Err(AuthError::UserStore(e)),
            }
        }

        Ok(None)
    }

    /// Close the session behind one cookie value, if there is one.
    ///
    /// Returns whether the value resolved to a session.
    async fn close_session(&self, name: &str, value: &str) -> bool {
        let Ok(token) = SessionToken::parse(value) else {
            return false;
        };

        let user_id = match self.session_repository.get(&token).await {
            Ok(user_id) => Some(user_id),
            // Lapsed sessions are still purged from the store.
            Err(SessionError::Expired) => None,
            Err(SessionError::NotFound) => return false,
            Err(e) => {
                tracing::warn!(cookie = %name, error = %e, "Session lookup failed during signout");
                return false;
            }
        };

        if let Err(e) = self.session_repository.delete(&token).await {
            tracing::warn!(cookie = %name, error = %e, "Failed to delete session during signout");
        } else if let Some(user_id) = user_id {
            tracing::info!(cookie = %name, user_id = %user_id, "User signed out");
        }

        true
    }
}

#[async_trait]
impl<UR, SR> AuthServicePort for AuthService<UR, SR>
where
    UR: UserRepository + ?Sized,
    SR: SessionRepository + ?Sized,
{
    async fn signup(&self, command: SignupCommand) -> Result<(), AuthError> {
        if !command.passwords_match() {
            return Err(AuthError::PasswordMismatch);
        }

        let password_hash = self.authenticator.hash_password(&command.password1)?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created = self.user_repository.create(user).await?;
        tracing::info!(user_id = %created.id, username = %created.username, "User signed up");

        Ok(())
    }

    async fn signin(&self, credentials: Credentials) -> Result<CookieSet, AuthError> {
        let Some(user) = self
            .find_signin_user(&credentials.username_or_email)
            .await?
        else {
            tracing::warn!(login = %credentials.username_or_email, "Sign-in for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        self.authenticator
            .authenticate(&credentials.password, &user.password_hash)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::warn!(username = %user.username, "Sign-in with wrong password");
                    AuthError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => AuthError::from(err),
            })?;

        let token = self.session_repository.create(&user.id).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User signed in");

        let mut cookies = CookieSet::new();
        cookies.insert(self.session_cookie.clone(), token.into_inner());
        Ok(cookies)
    }

    async fn signout(&self, cookies: &CookieSet) -> CookieDeletion {
        let mut expired = CookieDeletion::new();
        expired.insert(self.session_cookie.clone());

        for (name, value) in cookies {
            if self.close_session(name, value).await {
                expired.insert(name.clone());
            }
        }

        expired
    }

    async fn get_user(
        &self,
        username: &str,
        cookies: &CookieSet,
    ) -> Result<UserProfile, AuthError> {
        let caller = self.authenticate(cookies).await?;
        tracing::debug!(caller = %caller, username = %username, "Authorized user lookup");

        let username = Username::new(username.to_string())
            .map_err(|_| AuthError::NotFound(username.to_string()))?;

        self.user_repository
            .get_by_username(&username)
            .await
            .map(UserProfile::from)
            .map_err(AuthError::from)
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>, AuthError> {
        let users = self.user_repository.list_all().await?;
        Ok(users.iter().map(UserProfile::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockall::mock;
    use mockall::predicate::*;

    use super::*;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn get_by_username(&self, username: &Username) -> Result<User, UserError>;
            async fn get_by_email(&self, email: &EmailAddress) -> Result<User, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
        }
    }

    mock! {
        pub TestSessionRepository {}

        #[async_trait]
        impl SessionRepository for TestSessionRepository {
            fn ttl(&self) -> Duration;
            async fn create(&self, user_id: &UserId) -> Result<SessionToken, SessionError>;
            async fn get(&self, token: &SessionToken) -> Result<UserId, SessionError>;
            async fn delete(&self, token: &SessionToken) -> Result<(), SessionError>;
        }
    }

    fn signup_command(password1: &str, password2: &str) -> SignupCommand {
        SignupCommand::new(
            Username::new("alice".to_string()).unwrap(),
            EmailAddress::new("a@x.com".to_string()).unwrap(),
            password1.to_string(),
            password2.to_string(),
        )
    }

    fn stored_user(password: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            password_hash: Authenticator::new().hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn session_cookie(token: &str) -> CookieSet {
        let mut cookies = CookieSet::new();
        cookies.insert("session".to_string(), token.to_string());
        cookies
    }

    #[tokio::test]
    async fn test_signup_success() {
        let mut user_repository = MockTestUserRepository::new();
        let session_repository = MockTestSessionRepository::new();

        user_repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "alice"
                    && user.email.as_str() == "a@x.com"
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service.signup(signup_command("p1", "p1")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_signup_password_mismatch_stores_nothing() {
        let mut user_repository = MockTestUserRepository::new();
        let session_repository = MockTestSessionRepository::new();

        user_repository.expect_create().times(0);

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service.signup(signup_command("p1", "p2")).await;
        assert!(matches!(result, Err(AuthError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn test_signup_empty_password() {
        let mut user_repository = MockTestUserRepository::new();
        let session_repository = MockTestSessionRepository::new();

        user_repository.expect_create().times(0);

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service.signup(signup_command("", "")).await;
        assert!(matches!(result, Err(AuthError::EmptyPassword)));
    }

    #[tokio::test]
    async fn test_signup_duplicate_username() {
        let mut user_repository = MockTestUserRepository::new();
        let session_repository = MockTestSessionRepository::new();

        user_repository.expect_create().times(1).returning(|user| {
            Err(UserError::DuplicateUsername(
                user.username.as_str().to_string(),
            ))
        });

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service.signup(signup_command("p2", "p2")).await;
        assert!(matches!(result, Err(AuthError::DuplicateUsername(ref name)) if name == "alice"));
    }

    #[tokio::test]
    async fn test_signin_success_returns_single_session_cookie() {
        let mut user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        let user = stored_user("p1");
        let user_id = user.id;
        user_repository
            .expect_get_by_username()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(move |_| Ok(user.clone()));

        session_repository
            .expect_create()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(SessionToken::parse("token-123").unwrap()));

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let cookies = service
            .signin(Credentials::new("alice".to_string(), "p1".to_string()))
            .await
            .expect("Sign-in failed");

        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies.get("session").map(String::as_str), Some("token-123"));
    }

    #[tokio::test]
    async fn test_signin_by_email() {
        let mut user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        let user = stored_user("p1");
        user_repository.expect_get_by_username().times(0);
        user_repository
            .expect_get_by_email()
            .withf(|email| email.as_str() == "a@x.com")
            .times(1)
            .returning(move |_| Ok(user.clone()));

        session_repository
            .expect_create()
            .times(1)
            .returning(|_| Ok(SessionToken::parse("token-123").unwrap()));

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service
            .signin(Credentials::new("a@x.com".to_string(), "p1".to_string()))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_signin_wrong_password() {
        let mut user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        let user = stored_user("p1");
        user_repository
            .expect_get_by_username()
            .times(1)
            .returning(move |_| Ok(user.clone()));
        session_repository.expect_create().times(0);

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service
            .signin(Credentials::new("alice".to_string(), "wrong".to_string()))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_signin_unknown_user() {
        let mut user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        user_repository
            .expect_get_by_username()
            .times(1)
            .returning(|username| Err(UserError::NotFound(username.to_string())));
        session_repository.expect_create().times(0);

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service
            .signin(Credentials::new("nobody".to_string(), "p1".to_string()))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_signin_user_store_failure_is_not_masked() {
        let mut user_repository = MockTestUserRepository::new();
        let session_repository = MockTestSessionRepository::new();

        user_repository
            .expect_get_by_username()
            .times(1)
            .returning(|_| Err(UserError::Database("connection refused".to_string())));

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service
            .signin(Credentials::new("alice".to_string(), "p1".to_string()))
            .await;
        assert!(matches!(result, Err(AuthError::UserStore(_))));
    }

    #[tokio::test]
    async fn test_signout_deletes_resolved_sessions() {
        let user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        session_repository
            .expect_get()
            .withf(|token| token.as_str() == "token-123")
            .times(1)
            .returning(|_| Ok(UserId::new()));
        session_repository
            .expect_delete()
            .withf(|token| token.as_str() == "token-123")
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let expired = service.signout(&session_cookie("token-123")).await;
        assert!(expired.contains("session"));
    }

    #[tokio::test]
    async fn test_signout_scans_every_cookie() {
        let user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        session_repository
            .expect_get()
            .withf(|token| token.as_str() == "legacy-token")
            .times(1)
            .returning(|_| Ok(UserId::new()));
        session_repository
            .expect_get()
            .withf(|token| token.as_str() == "dark")
            .times(1)
            .returning(|_| Err(SessionError::NotFound));
        session_repository
            .expect_delete()
            .withf(|token| token.as_str() == "legacy-token")
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let mut cookies = CookieSet::new();
        cookies.insert("legacy_session".to_string(), "legacy-token".to_string());
        cookies.insert("theme".to_string(), "dark".to_string());

        let expired = service.signout(&cookies).await;
        assert!(expired.contains("session"));
        assert!(expired.contains("legacy_session"));
        assert!(!expired.contains("theme"));
    }

    #[tokio::test]
    async fn test_signout_without_session_still_expires_cookie() {
        let user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        session_repository.expect_get().times(0);
        session_repository.expect_delete().times(0);

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let expired = service.signout(&CookieSet::new()).await;
        assert_eq!(expired.len(), 1);
        assert!(expired.contains("session"));
    }

    #[tokio::test]
    async fn test_signout_swallows_backend_errors() {
        let user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        session_repository
            .expect_get()
            .times(1)
            .returning(|_| Err(SessionError::Backend("connection reset".to_string())));
        session_repository.expect_delete().times(0);

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let expired = service.signout(&session_cookie("token-123")).await;
        assert!(expired.contains("session"));
    }

    #[tokio::test]
    async fn test_signout_purges_expired_session() {
        let user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        session_repository
            .expect_get()
            .times(1)
            .returning(|_| Err(SessionError::Expired));
        session_repository
            .expect_delete()
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let expired = service.signout(&session_cookie("token-123")).await;
        assert!(expired.contains("session"));
    }

    #[tokio::test]
    async fn test_get_user_with_valid_session() {
        let mut user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        let user = stored_user("p1");
        let expected_id = user.id.to_string();
        session_repository
            .expect_get()
            .times(1)
            .returning(|_| Ok(UserId::new()));
        user_repository
            .expect_get_by_username()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(move |_| Ok(user.clone()));

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let profile = service
            .get_user("alice", &session_cookie("token-123"))
            .await
            .expect("Lookup failed");

        assert_eq!(profile.id, expected_id);
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_get_user_without_cookie_is_unauthorized() {
        let mut user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        session_repository.expect_get().times(0);
        user_repository.expect_get_by_username().times(0);

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service.get_user("alice", &CookieSet::new()).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_get_user_with_expired_session_is_unauthorized() {
        let mut user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        session_repository
            .expect_get()
            .times(1)
            .returning(|_| Err(SessionError::Expired));
        user_repository.expect_get_by_username().times(0);

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service
            .get_user("alice", &session_cookie("token-123"))
            .await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_get_user_unknown_username() {
        let mut user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        session_repository
            .expect_get()
            .times(1)
            .returning(|_| Ok(UserId::new()));
        user_repository
            .expect_get_by_username()
            .times(1)
            .returning(|username| Err(UserError::NotFound(username.to_string())));

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let result = service.get_user("bob", &session_cookie("token-123")).await;
        assert!(matches!(result, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_custom_session_cookie_name() {
        let user_repository = MockTestUserRepository::new();
        let mut session_repository = MockTestSessionRepository::new();

        session_repository.expect_get().times(0);

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository))
            .with_session_cookie("sid");

        // A token under the default name is not the session cookie anymore.
        let result = service
            .get_user("alice", &session_cookie("token-123"))
            .await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
        assert_eq!(service.session_cookie(), "sid");
    }

    #[tokio::test]
    async fn test_list_users_hides_password_hashes() {
        let mut user_repository = MockTestUserRepository::new();
        let session_repository = MockTestSessionRepository::new();

        let user = stored_user("p1");
        user_repository
            .expect_list_all()
            .times(1)
            .returning(move || Ok(vec![user.clone()]));

        let service = AuthService::new(Arc::new(user_repository), Arc::new(session_repository));

        let users = service.list_users().await.expect("Listing failed");
        assert_eq!(users.len(), 1);

        let json = serde_json::to_value(&users[0]).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
