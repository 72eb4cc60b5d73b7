use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use thiserror::Error;

/// Startup configuration failures. Any of these stops the process.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Logging level must be [debug|info|warning|error|critical], got '{0}'")]
    InvalidLogLevel(String),

    #[error("{family} kind must be [{allowed}], got '{kind}'")]
    UnknownBackend {
        family: &'static str,
        kind: String,
        allowed: String,
    },

    #[error("Port number must be integer, got '{0}'")]
    PortNotInteger(String),

    #[error("Port number must be within 0-65535, got {0}")]
    PortOutOfRange(i64),

    #[error("Missing {family} connection parameter: {parameter}")]
    MissingParameter {
        family: &'static str,
        parameter: &'static str,
    },

    #[error("Invalid {family} connection parameters: {reason}")]
    InvalidConnection {
        family: &'static str,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),
}

/// Application configuration.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session_cookie: SessionCookieConfig,
    pub user_repository: BackendConfig,
    pub session_repository: BackendConfig,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_docs_url")]
    pub docs_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            docs_url: default_docs_url(),
        }
    }
}

/// Attributes of the session cookie issued at sign-in.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionCookieConfig {
    #[serde(default = "default_cookie_name")]
    pub name: String,
    #[serde(default)]
    pub secure: bool,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            secure: false,
        }
    }
}

/// Store backend selection and connection parameters.
///
/// Everything but `kind` is optional because the in-memory backends need
/// none of it. `port` stays textual so that bad values surface as a
/// `ConfigurationError` from the backend registry.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub kind: String,
    pub host: Option<String>,
    pub port: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    /// Session lifetime in seconds. Ignored by user stores.
    #[serde(default = "default_session_ttl_secs")]
    pub ttl_secs: u64,
}

impl BackendConfig {
    /// Configuration for an in-memory backend.
    pub fn mock() -> Self {
        Self::with_kind("mock")
    }

    /// Configuration naming `kind` with no connection parameters set.
    pub fn with_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            host: None,
            port: None,
            user: None,
            password: None,
            database: None,
            ttl_secs: default_session_ttl_secs(),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Validated connection parameters handed to connected backends.
#[derive(Clone)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub session_ttl: Duration,
}

impl ConnectionParams {
    /// Validate the connection part of a backend configuration.
    ///
    /// # Errors
    /// * `PortNotInteger` / `PortOutOfRange` - Port is missing or invalid
    pub fn from_config(config: &BackendConfig) -> Result<Self, ConfigurationError> {
        let port = parse_port(config.port.as_deref().unwrap_or_default())?;

        Ok(Self {
            host: config
                .host
                .clone()
                .unwrap_or_else(|| "localhost".to_string()),
            port,
            user: config.user.clone(),
            password: config.password.clone(),
            database: config.database.clone(),
            session_ttl: config.session_ttl(),
        })
    }

    /// Fetch a parameter a backend cannot work without.
    ///
    /// # Errors
    /// * `MissingParameter` - Parameter was not configured
    pub fn require<'a>(
        value: &'a Option<String>,
        family: &'static str,
        parameter: &'static str,
    ) -> Result<&'a str, ConfigurationError> {
        value
            .as_deref()
            .ok_or(ConfigurationError::MissingParameter { family, parameter })
    }
}

// Keep credentials out of logs.
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

/// Parse a TCP port number.
///
/// # Errors
/// * `PortNotInteger` - Value is not an integer
/// * `PortOutOfRange` - Value is outside 0-65535
pub fn parse_port(value: &str) -> Result<u16, ConfigurationError> {
    let number: i64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigurationError::PortNotInteger(value.to_string()))?;

    u16::try_from(number).map_err(|_| ConfigurationError::PortOutOfRange(number))
}

/// Log verbosity accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl FromStr for LogLevel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            _ => Err(ConfigurationError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (LOG_LEVEL, USER_REPOSITORY__KIND, SESSION_REPOSITORY__PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// Returns error if required configuration values are missing or invalid
    pub fn load() -> Result<Self, ConfigurationError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: USER_REPOSITORY__KIND=postgres overrides user_repository.kind
            .add_source(Environment::default().separator("__"))
            .build()?;

        Ok(configuration.try_deserialize()?)
    }

    /// Validated log level.
    ///
    /// # Errors
    /// * `InvalidLogLevel` - Value is not one of the accepted levels
    pub fn log_level(&self) -> Result<LogLevel, ConfigurationError> {
        self.log_level.parse()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_docs_url() -> String {
    "/redoc".to_string()
}

fn default_cookie_name() -> String {
    crate::domain::auth::models::DEFAULT_SESSION_COOKIE.to_string()
}

fn default_session_ttl_secs() -> u64 {
    24 * 60 * 60
}
