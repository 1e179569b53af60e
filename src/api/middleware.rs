//! API middleware for authentication.

use crate::auth::AuthFailure;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authentication middleware.
///
/// Runs the bearer-token gate before the route handler. On success the
/// verified [`Principal`](crate::auth::Principal) is stored in the request
/// extensions and the handler runs; on failure the request is answered with
/// `401 Unauthorized` and the handler is skipped.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthFailure> {
    let principal = state
        .auth
        .authenticate_header(request.headers().get(header::AUTHORIZATION))
        .await?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
