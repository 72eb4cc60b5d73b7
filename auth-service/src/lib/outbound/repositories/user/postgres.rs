use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::ConfigurationError;
use crate::config::ConnectionParams;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USERNAME_CONSTRAINT: &str = "users_username_key";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a repository whose pool connects on first use.
    ///
    /// # Errors
    /// * `MissingParameter` - No database user configured
    pub fn connect_lazy(params: &ConnectionParams) -> Result<Self, ConfigurationError> {
        let user = ConnectionParams::require(&params.user, "user store", "user")?;

        let mut options = PgConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .username(user)
            .database(params.database.as_deref().unwrap_or("postgres"));
        if let Some(password) = &params.password {
            options = options.password(password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy_with(options);

        Ok(Self::new(pool))
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn initialize(&self) -> Result<(), UserError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        tracing::info!(database = "postgresql", "Database migrations completed");
        Ok(())
    }

    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some(USERNAME_CONSTRAINT)
                {
                    return UserError::DuplicateUsername(user.username.as_str().to_string());
                }
            }
            UserError::Database(e.to_string())
        })?;

        Ok(user)
    }

    async fn get_by_username(&self, username: &Username) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))?;

        row.ok_or_else(|| UserError::NotFound(username.to_string()))?
            .try_into()
    }

    async fn get_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))?;

        row.ok_or_else(|| UserError::NotFound(email.to_string()))?
            .try_into()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            ORDER BY created_at, username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))?;

        rows.into_iter().map(User::try_from).collect()
    }
}
