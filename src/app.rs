use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Routes served by every build of the service. The binary layers metrics
/// and CORS on top; tests drive this router directly.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/preview", post(handlers::link_preview::create_preview))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
