use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use axum_extra::extract::CookieJar;

use super::signin::SetCookies;
use super::ApiSuccess;
use super::Empty;
use crate::inbound::http::cookie::cookie_set;
use crate::inbound::http::cookie::set_cookie_headers;
use crate::inbound::http::router::AppState;

/// Close the caller's sessions and expire their cookies. Always succeeds.
pub async fn signout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (SetCookies, ApiSuccess<Empty>) {
    let expired = state.auth_service.signout(&cookie_set(&jar)).await;

    let policy = &state.cookie_policy;
    let headers = set_cookie_headers(expired.iter().map(|name| policy.expire(name)));

    (
        AppendHeaders(headers.into_iter().map(|v| (SET_COOKIE, v)).collect()),
        ApiSuccess::new(StatusCode::OK, Empty {}),
    )
}
