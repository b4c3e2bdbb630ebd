// GET /api/user/{user_id}/profile — one user's taste profile.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::web::AppState;

pub async fn get_profile(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    let deadline = tokio::time::Instant::now() + state.config.timeout;
    match state.comparator.profile(&user_id, deadline).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => {
            tracing::warn!(user = %user_id, error = %e, "Profile lookup failed");
            e.into_response()
        }
    }
}
