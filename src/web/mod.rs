// Web server — Axum JSON API in front of the comparison pipeline.
//
// Routes:
//   POST /api/compare?user1_id=..&user2_id=..   full comparison
//   GET  /api/user/{user_id}/profile            one user's taste profile
//   GET  /health                                liveness
//
// Each request gets a fresh deadline of `Config::timeout` from arrival.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::CompareError;
use crate::pipeline::compare::Comparator;

pub mod handlers;

/// State cloned into every handler. The comparator is stateless, so one
/// instance serves all requests.
#[derive(Clone)]
pub struct AppState {
    pub comparator: Arc<Comparator>,
    pub config: Arc<Config>,
}

/// Bind and serve until the process is stopped.
pub async fn run_server(config: Config, comparator: Comparator, port: u16, bind: &str) -> Result<()> {
    let state = AppState {
        comparator: Arc::new(comparator),
        config: Arc::new(config),
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("tastematch API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/compare", post(handlers::compare::compare_users))
        .route(
            "/api/user/{user_id}/profile",
            get(handlers::profile::get_profile),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// JSON error body shared by every failing route.
pub fn api_error(status: StatusCode, message: &str, retryable: bool) -> Response {
    (
        status,
        axum::Json(serde_json::json!({ "error": message, "retryable": retryable })),
    )
        .into_response()
}

impl IntoResponse for CompareError {
    fn into_response(self) -> Response {
        let status = match self {
            CompareError::UserNotFound(_) => StatusCode::NOT_FOUND,
            CompareError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        api_error(status, &self.to_string(), self.is_retryable())
    }
}
