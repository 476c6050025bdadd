//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - REST API under `/api/...`
/// - Static SPA from `./dist` with index fallback (the built React frontend)
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./dist")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./dist/index.html"));

    Router::new()
        .route("/health", get(http::http_health))
        .route("/api/questions", post(http::http_post_questions))
        .route("/api/run-code", post(http::http_post_run_code))
        .route("/api/check-solution", post(http::http_post_check_solution))
        .route("/api/dataset-details", post(http::http_post_dataset_details))
        .route("/api/agent/message", post(http::http_post_agent_message))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
