use std::time::Duration;

use async_trait::async_trait;
use auth::SessionToken;
use auth::SessionTokenGenerator;
use redis::aio::ConnectionManager;
use redis::Client;
use redis::IntoConnectionInfo;
use redis::RedisError;
use tokio::sync::OnceCell;

use crate::config::ConfigurationError;
use crate::config::ConnectionParams;
use crate::domain::session::errors::SessionError;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::UserId;

const KEY_PREFIX: &str = "session:";

/// Redis implementation of SessionRepository.
///
/// Sessions are plain keys holding the user ID, expired by Redis itself
/// through the key TTL. A lapsed session is indistinguishable from one
/// that never existed, so lookups report `NotFound` for both.
pub struct RedisSessionRepository {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    generator: SessionTokenGenerator,
    ttl_secs: u64,
}

impl RedisSessionRepository {
    /// Build a client for the configured server. Connects on first use.
    ///
    /// # Errors
    /// * `InvalidConnection` - Parameters do not form a valid Redis address
    pub fn new(params: &ConnectionParams) -> Result<Self, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidConnection {
            family: "session store",
            reason,
        };

        let mut info = (params.host.clone(), params.port)
            .into_connection_info()
            .map_err(|e| invalid(e.to_string()))?;
        info.redis.username = params.user.clone();
        info.redis.password = params.password.clone();
        if let Some(database) = &params.database {
            info.redis.db = database
                .parse()
                .map_err(|_| invalid(format!("database must be a number, got '{}'", database)))?;
        }

        let client = Client::open(info).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
            generator: SessionTokenGenerator::new(),
            // Redis rejects a zero expiry
            ttl_secs: params.session_ttl.as_secs().max(1),
        })
    }

    fn key(token: &SessionToken) -> String {
        format!("{}{}", KEY_PREFIX, token.as_str())
    }

    async fn connection(&self) -> Result<ConnectionManager, SessionError> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                let manager = ConnectionManager::new(self.client.clone()).await?;
                tracing::info!(backend = "redis", "Session cache connection established");
                Ok::<_, RedisError>(manager)
            })
            .await
            .map_err(backend_error)?;

        Ok(manager.clone())
    }
}

fn backend_error(err: RedisError) -> SessionError {
    SessionError::Backend(err.to_string())
}

#[async_trait]
impl SessionRepository for RedisSessionRepository {
    fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    async fn initialize(&self) -> Result<(), SessionError> {
        let mut connection = self.connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut connection)
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn create(&self, user_id: &UserId) -> Result<SessionToken, SessionError> {
        let token = self.generator.generate();
        let mut connection = self.connection().await?;

        redis::cmd("SET")
            .arg(Self::key(&token))
            .arg(user_id.to_string())
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut connection)
            .await
            .map_err(backend_error)?;

        tracing::debug!(user_id = %user_id, backend = "redis", "Session stored");
        Ok(token)
    }

    async fn get(&self, token: &SessionToken) -> Result<UserId, SessionError> {
        let mut connection = self.connection().await?;

        let value = redis::cmd("GET")
            .arg(Self::key(token))
            .query_async::<_, Option<String>>(&mut connection)
            .await
            .map_err(backend_error)?
            .ok_or(SessionError::NotFound)?;

        UserId::from_string(&value).map_err(|e| SessionError::Backend(e.to_string()))
    }

    async fn delete(&self, token: &SessionToken) -> Result<(), SessionError> {
        let mut connection = self.connection().await?;

        let removed = redis::cmd("DEL")
            .arg(Self::key(token))
            .query_async::<_, i64>(&mut connection)
            .await
            .map_err(backend_error)?;

        tracing::debug!(removed, backend = "redis", "Session deleted");
        Ok(())
    }
}
