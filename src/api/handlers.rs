//! API request handlers.

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, AuthErrorResponse};
use crate::models::{DashboardSummary, DbCheckResponse, HealthResponse, ProtectedResponse};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::Uri;
use std::sync::Arc;
use tracing::error;

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Database Smoke Test
// ============================================================================

/// Checks that the database answers a query on the `users` table.
///
/// Failures are reported in the body with status 200.
#[utoipa::path(
    get,
    path = "/test-db",
    responses(
        (status = 200, description = "Database check result", body = DbCheckResponse)
    ),
    tag = "Health"
)]
pub async fn test_db(State(state): State<Arc<AppState>>) -> Json<DbCheckResponse> {
    let Some(db) = &state.db else {
        error!("Database check requested but no database is configured");
        return Json(DbCheckResponse::failed());
    };

    match db.count_users().await {
        Ok(count) => Json(DbCheckResponse::connected(count)),
        Err(e) => {
            error!("Database check failed: {}", e);
            Json(DbCheckResponse::failed())
        }
    }
}

// ============================================================================
// Protected Routes
// ============================================================================

/// Example route requiring a bearer token.
#[utoipa::path(
    get,
    path = "/protected",
    responses(
        (status = 200, description = "Caller is authenticated", body = ProtectedResponse),
        (status = 401, description = "Missing or invalid bearer token", body = AuthErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn protected(AuthenticatedUser(user): AuthenticatedUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "This is a protected route".to_string(),
        user,
    })
}

/// Dashboard summary for the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 401, description = "Missing or invalid bearer token", body = AuthErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_dashboard(AuthenticatedUser(user): AuthenticatedUser) -> Json<DashboardSummary> {
    Json(DashboardSummary::empty(user))
}

// ============================================================================
// Fallback
// ============================================================================

/// Handler for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
