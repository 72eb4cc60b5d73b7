use axum::extract::State;
use axum::response::Redirect;

use crate::inbound::http::router::AppState;

/// Send visitors of the root to the API documentation.
pub async fn index(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.docs_url)
}
