use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use oracle::Connection;

use crate::config::ConfigurationError;
use crate::config::ConnectionParams;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

// ORA-00001: unique constraint violated
const UNIQUE_VIOLATION: i32 = 1;
// ORA-00955: name is already used by an existing object
const NAME_ALREADY_USED: i32 = 955;

const DEFAULT_SERVICE_NAME: &str = "XEPDB1";

type UserRecord = (String, String, String, String, DateTime<Utc>);

struct OracleSettings {
    user: String,
    password: String,
    connect_string: String,
}

/// Oracle Database implementation of UserRepository.
///
/// The driver is blocking, so every operation opens a connection on the
/// blocking thread pool and closes it when done.
pub struct OracleUserRepository {
    settings: Arc<OracleSettings>,
}

impl OracleUserRepository {
    /// Keep connection settings; no connection is opened here.
    ///
    /// # Errors
    /// * `MissingParameter` - User or password not configured
    pub fn new(params: &ConnectionParams) -> Result<Self, ConfigurationError> {
        let user = ConnectionParams::require(&params.user, "user store", "user")?;
        let password = ConnectionParams::require(&params.password, "user store", "password")?;
        let service = params.database.as_deref().unwrap_or(DEFAULT_SERVICE_NAME);

        Ok(Self {
            settings: Arc::new(OracleSettings {
                user: user.to_string(),
                password: password.to_string(),
                connect_string: format!("//{}:{}/{}", params.host, params.port, service),
            }),
        })
    }

    async fn with_connection<T, F>(&self, operation: F) -> Result<T, UserError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, UserError> + Send + 'static,
    {
        let settings = Arc::clone(&self.settings);

        tokio::task::spawn_blocking(move || {
            let connection = Connection::connect(
                &settings.user,
                &settings.password,
                &settings.connect_string,
            )
            .map_err(database_error)?;

            operation(&connection)
        })
        .await
        .map_err(|e| UserError::Database(format!("Oracle worker failed: {}", e)))?
    }
}

fn database_error(err: oracle::Error) -> UserError {
    UserError::Database(err.to_string())
}

fn error_code(err: &oracle::Error) -> Option<i32> {
    match err {
        oracle::Error::OciError(db_err) | oracle::Error::DpiError(db_err) => Some(db_err.code()),
        _ => None,
    }
}

fn into_user(record: UserRecord) -> Result<User, UserError> {
    let (id, username, email, password_hash, created_at) = record;
    Ok(User {
        id: UserId::from_string(&id)?,
        username: Username::new(username)?,
        email: EmailAddress::new(email)?,
        password_hash,
        created_at,
    })
}

fn fetch_one(connection: &Connection, sql: &str, key: &str) -> Result<User, UserError> {
    match connection.query_row_as::<UserRecord>(sql, &[&key]) {
        Ok(record) => into_user(record),
        Err(oracle::Error::NoDataFound) => Err(UserError::NotFound(key.to_string())),
        Err(e) => Err(database_error(e)),
    }
}

#[async_trait]
impl UserRepository for OracleUserRepository {
    async fn initialize(&self) -> Result<(), UserError> {
        self.with_connection(|connection| {
            let created = connection.execute(
                r#"
                CREATE TABLE users (
                    id VARCHAR2(36) PRIMARY KEY,
                    username VARCHAR2(32) NOT NULL CONSTRAINT users_username_key UNIQUE,
                    email VARCHAR2(320) NOT NULL,
                    password_hash VARCHAR2(255) NOT NULL,
                    created_at TIMESTAMP WITH TIME ZONE NOT NULL
                )
                "#,
                &[],
            );

            match created {
                Ok(_) => {
                    tracing::info!(database = "oracle", "Users table created");
                    Ok(())
                }
                Err(e) if error_code(&e) == Some(NAME_ALREADY_USED) => {
                    tracing::debug!(database = "oracle", "Users table already exists");
                    Ok(())
                }
                Err(e) => Err(database_error(e)),
            }
        })
        .await
    }

    async fn create(&self, user: User) -> Result<User, UserError> {
        self.with_connection(move |connection| {
            let id = user.id.to_string();
            let inserted = connection.execute(
                r#"
                INSERT INTO users (id, username, email, password_hash, created_at)
                VALUES (:1, :2, :3, :4, :5)
                "#,
                &[
                    &id,
                    &user.username.as_str(),
                    &user.email.as_str(),
                    &user.password_hash,
                    &user.created_at,
                ],
            );

            match inserted {
                Ok(_) => {}
                Err(e) if error_code(&e) == Some(UNIQUE_VIOLATION) => {
                    return Err(UserError::DuplicateUsername(
                        user.username.as_str().to_string(),
                    ));
                }
                Err(e) => return Err(database_error(e)),
            }

            connection.commit().map_err(database_error)?;
            Ok(user)
        })
        .await
    }

    async fn get_by_username(&self, username: &Username) -> Result<User, UserError> {
        let username = username.as_str().to_string();
        self.with_connection(move |connection| {
            fetch_one(
                connection,
                r#"
                SELECT id, username, email, password_hash, created_at
                FROM users
                WHERE username = :1
                "#,
                &username,
            )
        })
        .await
    }

    async fn get_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        let email = email.as_str().to_string();
        self.with_connection(move |connection| {
            fetch_one(
                connection,
                r#"
                SELECT id, username, email, password_hash, created_at
                FROM users
                WHERE email = :1
                ORDER BY created_at
                FETCH FIRST 1 ROWS ONLY
                "#,
                &email,
            )
        })
        .await
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        self.with_connection(|connection| {
            let rows = connection
                .query_as::<UserRecord>(
                    r#"
                    SELECT id, username, email, password_hash, created_at
                    FROM users
                    ORDER BY created_at, username
                    "#,
                    &[],
                )
                .map_err(database_error)?;

            rows.map(|row| row.map_err(database_error).and_then(into_user))
                .collect()
        })
        .await
    }
}
