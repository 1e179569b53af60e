//! Route configuration.

use crate::api::{handlers, middleware};
use crate::state::AppState;
use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use std::sync::Arc;

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/protected", get(handlers::protected))
        .route("/api/v1/dashboard", get(handlers::get_dashboard))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Database smoke test
        .route("/test-db", get(handlers::test_db))
        .merge(protected)
        .fallback(handlers::not_found)
        .with_state(state)
}
