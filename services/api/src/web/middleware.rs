//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting the admin routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::web::state::AppState;

/// Middleware that validates the admin bearer token.
///
/// If the token is present in the active session set and unexpired, the
/// request continues to the handler. Otherwise the request is rejected
/// with 401 Unauthorized before anything else happens.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract the Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Parse the bearer token out of it
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?
        .trim();

    // 3. Check it against the active session set
    if !state.sessions.is_valid(token) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    // 4. Continue to the handler
    Ok(next.run(req).await)
}
