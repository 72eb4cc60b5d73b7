use std::sync::Arc;

use auth_service::config::Config;
use auth_service::domain::auth::service::DynAuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::registry::select_session_store;
use auth_service::registry::select_user_store;
use auth_service::telemetry;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;
    let log_level = config.log_level()?;
    telemetry::init(log_level)?;

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    tracing::info!(
        log_level = ?log_level,
        http_port = config.server.http_port,
        user_store = %config.user_repository.kind,
        session_store = %config.session_repository.kind,
        session_cookie = %config.session_cookie.name,
        "Configuration loaded"
    );

    let user_repository = select_user_store(&config.user_repository)?;
    let session_repository = select_session_store(&config.session_repository)?;

    user_repository.initialize().await?;
    session_repository.initialize().await?;
    tracing::info!("Stores initialized");

    // Cookies live exactly as long as the store keeps their session.
    let session_ttl = session_repository.ttl();

    let auth_service: Arc<DynAuthService> = Arc::new(
        DynAuthService::new(user_repository, session_repository)
            .with_session_cookie(config.session_cookie.name.clone()),
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        auth_service,
        &config.session_cookie,
        session_ttl,
        config.server.docs_url.clone(),
    );

    axum::serve(http_listener, http_application).await?;
    tracing::info!("Server exited");

    Ok(())
}
