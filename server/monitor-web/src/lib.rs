//! Pipeline Monitor Web UI
//!
//! HTTP front end over one log snapshot: static pages from a directory and
//! JSON report endpoints. Bind to 127.0.0.1 by default (internal only).

mod handlers;
mod state;
mod types;

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use handlers::{aggregator_statistic, attrition, health, pipeline_statistic};
pub use state::AppState;
pub use types::{ApiError, ErrorOutput};

/// Routes of the web UI; anything not under `/api` or `/health` is served
/// from `static_dir`.
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/aggregator/statistic", get(aggregator_statistic))
    .route("/api/aggregator/attrition/:step", get(attrition))
    .route("/api/pipeline/statistic", get(pipeline_statistic))
    .fallback_service(ServeDir::new(static_dir))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}
