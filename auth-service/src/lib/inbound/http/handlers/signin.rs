use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::Empty;
use crate::domain::auth::models::Credentials;
use crate::inbound::http::cookie::set_cookie_headers;
use crate::inbound::http::router::AppState;

pub type SetCookies = AppendHeaders<Vec<(HeaderName, HeaderValue)>>;

/// Open a session and hand its token to the client as an HttpOnly cookie.
pub async fn signin(
    State(state): State<AppState>,
    Json(body): Json<SigninRequest>,
) -> Result<(SetCookies, ApiSuccess<Empty>), ApiError> {
    let cookies = state
        .auth_service
        .signin(Credentials::new(body.username_or_email, body.password))
        .await?;

    let policy = &state.cookie_policy;
    let headers = set_cookie_headers(
        cookies
            .iter()
            .map(|(name, value)| policy.issue(name, value)),
    );

    Ok((
        AppendHeaders(headers.into_iter().map(|v| (SET_COOKIE, v)).collect()),
        ApiSuccess::new(StatusCode::OK, Empty {}),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SigninRequest {
    username_or_email: String,
    password: String,
}
