use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use auth::SessionToken;
use auth::SessionTokenGenerator;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Session;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::UserId;

/// In-memory session store for development and tests.
///
/// Lapsed sessions stay in the map until deleted so that lookups can tell
/// `Expired` apart from `NotFound`.
pub struct MockSessionRepository {
    sessions: RwLock<HashMap<String, Session>>,
    generator: SessionTokenGenerator,
    ttl: Duration,
}

impl MockSessionRepository {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    pub fn new() -> Self {
        Self::with_ttl(Self::DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            generator: SessionTokenGenerator::new(),
            ttl,
        }
    }

    /// Number of stored sessions, lapsed ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for MockSessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn create(&self, user_id: &UserId) -> Result<SessionToken, SessionError> {
        let token = self.generator.generate();
        let session = Session::start(token.clone(), *user_id, self.ttl);

        self.sessions
            .write()
            .await
            .insert(token.as_str().to_string(), session);

        tracing::debug!(user_id = %user_id, backend = "mock", "Session stored");
        Ok(token)
    }

    async fn get(&self, token: &SessionToken) -> Result<UserId, SessionError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token.as_str()).ok_or(SessionError::NotFound)?;

        if session.is_expired_at(Utc::now()) {
            return Err(SessionError::Expired);
        }

        Ok(session.user_id)
    }

    async fn delete(&self, token: &SessionToken) -> Result<(), SessionError> {
        self.sessions.write().await.remove(token.as_str());
        Ok(())
    }
}
