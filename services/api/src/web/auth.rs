//! services/api/src/web/auth.rs
//!
//! Admin login and token verification endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/admin/login - Exchange the shared admin password for a bearer token
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Wrong password")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state
        .sessions
        .authenticate(&req.password)
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Wrong password".to_string()))?;

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
    }))
}

/// GET /api/admin/verify - Check whether the presented token is still valid
///
/// The admin middleware has already validated the bearer token by the time
/// this handler runs; reaching it means the session is live.
#[utoipa::path(
    get,
    path = "/api/admin/verify",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing, unknown or expired token")
    )
)]
pub async fn verify_handler() -> Json<VerifyResponse> {
    Json(VerifyResponse { valid: true })
}
