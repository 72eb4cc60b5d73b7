use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserProfile;
use crate::inbound::http::cookie::cookie_set;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    jar: CookieJar,
) -> Result<ApiSuccess<UserProfile>, ApiError> {
    state
        .auth_service
        .get_user(&username, &cookie_set(&jar))
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile))
}
