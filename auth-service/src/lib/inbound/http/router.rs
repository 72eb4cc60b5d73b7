use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookie::CookiePolicy;
use super::handlers::get_user::get_user;
use super::handlers::index::index;
use super::handlers::list_users::list_users;
use super::handlers::signin::signin;
use super::handlers::signout::signout;
use super::handlers::signup::signup;
use crate::config::SessionCookieConfig;
use crate::domain::auth::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub cookie_policy: CookiePolicy,
    pub docs_url: String,
}

/// Build the HTTP application.
///
/// # Arguments
/// * `auth_service` - Service backing every route
/// * `session_cookie` - Attributes of issued session cookies
/// * `session_ttl` - Max-Age of issued session cookies
/// * `docs_url` - Redirect target of `GET /`
pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    session_cookie: &SessionCookieConfig,
    session_ttl: Duration,
    docs_url: impl Into<String>,
) -> Router {
    let state = AppState {
        auth_service,
        cookie_policy: CookiePolicy::new(session_cookie, session_ttl),
        docs_url: docs_url.into(),
    };

    let api_routes = Router::new()
        .route("/users", get(list_users).post(signup))
        .route("/users/:username", get(get_user))
        .route("/signin", post(signin).delete(signout));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/", get(index))
        .nest("/api/auth/v1", api_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
