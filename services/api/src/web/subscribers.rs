//! services/api/src/web/subscribers.rs
//!
//! Public subscription endpoint plus the admin-side subscriber management
//! handlers (list, delete, bulk selection).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use reflections_core::domain::Subscriber;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::error_response;
use crate::web::rest::DeleteResponse;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SubscribeRequest {
    pub email: String,
}

/// A subscriber record as returned to the admin panel.
#[derive(Serialize, ToSchema)]
pub struct SubscriberView {
    pub email: String,
    pub date: String,
    pub selected: bool,
}

impl From<Subscriber> for SubscriberView {
    fn from(subscriber: Subscriber) -> Self {
        Self {
            email: subscriber.email,
            date: subscriber.date,
            selected: subscriber.selected,
        }
    }
}

/// Bulk toggle of the `selected` flag on the listed addresses.
#[derive(Deserialize, ToSchema)]
pub struct SelectionRequest {
    pub emails: Vec<String>,
    pub selected: bool,
}

#[derive(Serialize, ToSchema)]
pub struct SelectionResponse {
    pub updated: u64,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/subscribe - Register an email address for the newsletter
#[utoipa::path(
    post,
    path = "/api/subscribe",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscription created", body = SubscriberView),
        (status = 400, description = "Malformed or already registered address"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn subscribe_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let created = state
        .subscribers
        .subscribe(&req.email)
        .await
        .map_err(|e| error_response("create subscription", e))?;

    Ok((StatusCode::CREATED, Json(SubscriberView::from(created))))
}

/// GET /api/admin/subscribers - List all subscribers
#[utoipa::path(
    get,
    path = "/api/admin/subscribers",
    responses(
        (status = 200, description = "All subscribers", body = [SubscriberView]),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_subscribers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let subscribers = state
        .subscribers
        .list()
        .await
        .map_err(|e| error_response("list subscribers", e))?;

    let views: Vec<SubscriberView> = subscribers.into_iter().map(SubscriberView::from).collect();
    Ok(Json(views))
}

/// DELETE /api/admin/subscribers/{email} - Remove a subscriber
#[utoipa::path(
    delete,
    path = "/api/admin/subscribers/{email}",
    responses(
        (status = 200, description = "Subscriber removed", body = DeleteResponse),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "No subscriber with that address"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("email" = String, Path, description = "The subscriber's email address.")
    )
)]
pub async fn delete_subscriber_handler(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .subscribers
        .remove(&email)
        .await
        .map_err(|e| error_response("delete subscriber", e))?;

    Ok(Json(DeleteResponse { success: true }))
}

/// PUT /api/admin/subscribers/selection - Toggle which subscribers receive the newsletter
#[utoipa::path(
    put,
    path = "/api/admin/subscribers/selection",
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Selection updated", body = SelectionResponse),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_selection_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let updated = state
        .subscribers
        .set_selection(&req.emails, req.selected)
        .await
        .map_err(|e| error_response("update subscriber selection", e))?;

    Ok(Json(SelectionResponse { updated }))
}
