//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the reflection REST endpoints and the
//! master definition for the OpenAPI specification.

use crate::web::auth::{LoginRequest, LoginResponse, VerifyResponse};
use crate::web::error_response;
use crate::web::newsletter::{NewsletterRequest, NewsletterResponse, OutcomeView};
use crate::web::state::AppState;
use crate::web::subscribers::{
    SelectionRequest, SelectionResponse, SubscribeRequest, SubscriberView,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use reflections_core::domain::{NewReflection, ReflectionEntry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_reflections_handler,
        create_reflection_handler,
        update_reflection_handler,
        delete_reflection_handler,
        crate::web::subscribers::subscribe_handler,
        crate::web::subscribers::list_subscribers_handler,
        crate::web::subscribers::delete_subscriber_handler,
        crate::web::subscribers::update_selection_handler,
        crate::web::auth::login_handler,
        crate::web::auth::verify_handler,
        crate::web::newsletter::send_newsletter_handler,
    ),
    components(
        schemas(
            ReflectionPayload,
            ReflectionView,
            DeleteResponse,
            SubscribeRequest,
            SubscriberView,
            SelectionRequest,
            SelectionResponse,
            LoginRequest,
            LoginResponse,
            VerifyResponse,
            NewsletterRequest,
            NewsletterResponse,
            OutcomeView,
        )
    ),
    tags(
        (name = "Daily Reflections API", description = "API endpoints for the reflections blog and its newsletter.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The request payload for creating or fully replacing a reflection.
#[derive(Deserialize, ToSchema)]
pub struct ReflectionPayload {
    pub title: String,
    pub body: String,
    pub date: String,
}

impl From<ReflectionPayload> for NewReflection {
    fn from(payload: ReflectionPayload) -> Self {
        NewReflection {
            title: payload.title,
            body: payload.body,
            date: payload.date,
        }
    }
}

/// A stored reflection as returned to clients.
#[derive(Serialize, ToSchema)]
pub struct ReflectionView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: String,
}

impl From<ReflectionEntry> for ReflectionView {
    fn from(entry: ReflectionEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            body: entry.body,
            date: entry.date,
        }
    }
}

/// Confirmation payload for delete endpoints.
#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List all reflections, most recent date first.
#[utoipa::path(
    get,
    path = "/api/reflections",
    responses(
        (status = 200, description = "All reflections, sorted by date descending", body = [ReflectionView]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_reflections_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let entries = state
        .reflections
        .list()
        .await
        .map_err(|e| error_response("list reflections", e))?;

    let views: Vec<ReflectionView> = entries.into_iter().map(ReflectionView::from).collect();
    Ok(Json(views))
}

/// Create a new reflection.
#[utoipa::path(
    post,
    path = "/api/reflections",
    request_body = ReflectionPayload,
    responses(
        (status = 201, description = "Reflection created", body = ReflectionView),
        (status = 400, description = "Missing or blank required field"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_reflection_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReflectionPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let created = state
        .reflections
        .create(payload.into())
        .await
        .map_err(|e| error_response("create reflection", e))?;

    Ok((StatusCode::CREATED, Json(ReflectionView::from(created))))
}

/// Fully replace the reflection stored under `id`.
#[utoipa::path(
    put,
    path = "/api/reflections/{id}",
    request_body = ReflectionPayload,
    responses(
        (status = 200, description = "Reflection updated", body = ReflectionView),
        (status = 400, description = "Missing or blank required field"),
        (status = 404, description = "No reflection with that id"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = String, Path, description = "The opaque id of the reflection.")
    )
)]
pub async fn update_reflection_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ReflectionPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let updated = state
        .reflections
        .update(&id, payload.into())
        .await
        .map_err(|e| error_response("update reflection", e))?;

    Ok(Json(ReflectionView::from(updated)))
}

/// Delete the reflection stored under `id`.
#[utoipa::path(
    delete,
    path = "/api/reflections/{id}",
    responses(
        (status = 200, description = "Reflection deleted", body = DeleteResponse),
        (status = 404, description = "No reflection with that id"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = String, Path, description = "The opaque id of the reflection.")
    )
)]
pub async fn delete_reflection_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .reflections
        .delete(&id)
        .await
        .map_err(|e| error_response("delete reflection", e))?;

    Ok(Json(DeleteResponse { success: true }))
}
