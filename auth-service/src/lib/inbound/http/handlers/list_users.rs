use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserProfile;
use crate::inbound::http::router::AppState;

/// List every registered user.
///
/// Unauthenticated. Meant for debugging; profiles never carry password hashes.
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<UserProfile>>, ApiError> {
    state
        .auth_service
        .list_users()
        .await
        .map_err(ApiError::from)
        .map(|users| ApiSuccess::new(StatusCode::OK, users))
}
