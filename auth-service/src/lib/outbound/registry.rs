//! Backend selection.
//!
//! Each store family keeps a registry from backend kind to constructor.
//! The binary consults it once at startup; an unknown kind or bad
//! connection parameters abort startup with a `ConfigurationError`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::BackendConfig;
use crate::config::ConfigurationError;
use crate::config::ConnectionParams;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::ports::UserRepository;
use crate::outbound::repositories::MockSessionRepository;
use crate::outbound::repositories::MockUserRepository;
use crate::outbound::repositories::OracleUserRepository;
use crate::outbound::repositories::PostgresUserRepository;
use crate::outbound::repositories::RedisSessionRepository;

/// How a registered backend is built.
pub enum Backend<T: ?Sized> {
    /// Needs no connection parameters (in-memory stores).
    Standalone(fn(&BackendConfig) -> Arc<T>),
    /// Built from validated connection parameters. Must not perform I/O.
    Connected(fn(&ConnectionParams) -> Result<Arc<T>, ConfigurationError>),
}

/// Registry from backend kind to constructor for one store family.
pub struct BackendRegistry<T: ?Sized> {
    family: &'static str,
    backends: BTreeMap<&'static str, Backend<T>>,
}

impl<T: ?Sized> BackendRegistry<T> {
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            backends: BTreeMap::new(),
        }
    }

    /// Register a backend under a lowercase kind name.
    pub fn register(mut self, kind: &'static str, backend: Backend<T>) -> Self {
        self.backends.insert(kind, backend);
        self
    }

    /// Registered kinds, `|`-separated, in alphabetical order.
    pub fn allowed(&self) -> String {
        self.backends.keys().copied().collect::<Vec<_>>().join("|")
    }

    /// Build the backend named by `config.kind`.
    ///
    /// The kind is matched case-insensitively. Standalone backends are
    /// built without looking at connection parameters; for any other kind
    /// the port is validated before dispatch.
    ///
    /// # Errors
    /// * `PortNotInteger` / `PortOutOfRange` - Invalid port for a connected backend
    /// * `UnknownBackend` - Kind is not registered
    /// * Constructor-specific errors such as `MissingParameter`
    pub fn select(&self, config: &BackendConfig) -> Result<Arc<T>, ConfigurationError> {
        let kind = config.kind.trim().to_lowercase();
        let backend = self.backends.get(kind.as_str());

        if let Some(Backend::Standalone(build)) = backend {
            tracing::info!(family = self.family, backend = %kind, "Store selected");
            return Ok(build(config));
        }

        let params = ConnectionParams::from_config(config)?;

        match backend {
            Some(Backend::Connected(build)) => {
                let store = build(&params)?;
                tracing::info!(
                    family = self.family,
                    backend = %kind,
                    host = %params.host,
                    port = params.port,
                    "Store selected"
                );
                Ok(store)
            }
            _ => Err(ConfigurationError::UnknownBackend {
                family: self.family,
                kind: config.kind.clone(),
                allowed: self.allowed(),
            }),
        }
    }
}

fn mock_user_store(_: &BackendConfig) -> Arc<dyn UserRepository> {
    Arc::new(MockUserRepository::new())
}

fn postgres_user_store(
    params: &ConnectionParams,
) -> Result<Arc<dyn UserRepository>, ConfigurationError> {
    Ok(Arc::new(PostgresUserRepository::connect_lazy(params)?))
}

fn oracle_user_store(
    params: &ConnectionParams,
) -> Result<Arc<dyn UserRepository>, ConfigurationError> {
    Ok(Arc::new(OracleUserRepository::new(params)?))
}

fn mock_session_store(config: &BackendConfig) -> Arc<dyn SessionRepository> {
    Arc::new(MockSessionRepository::with_ttl(config.session_ttl()))
}

fn redis_session_store(
    params: &ConnectionParams,
) -> Result<Arc<dyn SessionRepository>, ConfigurationError> {
    Ok(Arc::new(RedisSessionRepository::new(params)?))
}

/// Registered user store backends.
pub fn user_stores() -> BackendRegistry<dyn UserRepository> {
    BackendRegistry::new("User store")
        .register("mock", Backend::Standalone(mock_user_store))
        .register("postgres", Backend::Connected(postgres_user_store))
        .register("oracle", Backend::Connected(oracle_user_store))
}

/// Registered session store backends.
pub fn session_stores() -> BackendRegistry<dyn SessionRepository> {
    BackendRegistry::new("Session store")
        .register("mock", Backend::Standalone(mock_session_store))
        .register("redis", Backend::Connected(redis_session_store))
}

/// Build the configured user store.
///
/// # Errors
/// Any `ConfigurationError` from [`BackendRegistry::select`]
pub fn select_user_store(
    config: &BackendConfig,
) -> Result<Arc<dyn UserRepository>, ConfigurationError> {
    user_stores().select(config)
}

/// Build the configured session store.
///
/// # Errors
/// Any `ConfigurationError` from [`BackendRegistry::select`]
pub fn select_session_store(
    config: &BackendConfig,
) -> Result<Arc<dyn SessionRepository>, ConfigurationError> {
    session_stores().select(config)
}
