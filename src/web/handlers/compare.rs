// POST /api/compare — compare two users' tastes.
//
// Query parameters: user1_id, user2_id (both required). Returns the
// ComparisonResult JSON on success, 404 if either user is unknown, 503 if
// the catalog failed or the deadline passed, 400 if an id is blank.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::web::{api_error, AppState};

/// Both ids are optional at the extractor so a missing one gets the same
/// JSON error body as every other failure.
#[derive(Deserialize)]
pub struct CompareQuery {
    pub user1_id: Option<String>,
    pub user2_id: Option<String>,
}

pub async fn compare_users(State(state): State<AppState>, Query(params): Query<CompareQuery>) -> Response {
    let present = |id: Option<String>| id.filter(|s| !s.trim().is_empty());
    let (Some(user1_id), Some(user2_id)) = (present(params.user1_id), present(params.user2_id)) else {
        return api_error(StatusCode::BAD_REQUEST, "user1_id and user2_id are required", false);
    };

    let deadline = tokio::time::Instant::now() + state.config.timeout;
    match state.comparator.compare(&user1_id, &user2_id, deadline).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::warn!(
                user1 = %user1_id,
                user2 = %user2_id,
                error = %e,
                "Comparison failed"
            );
            e.into_response()
        }
    }
}
