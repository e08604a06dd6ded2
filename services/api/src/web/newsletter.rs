//! services/api/src/web/newsletter.rs
//!
//! The bulk newsletter endpoint: hands the message and the selected
//! recipient set to the dispatcher and reports the per-address outcomes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use reflections_core::domain::DispatchSummary;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct NewsletterRequest {
    pub subject: String,
    pub body: String,
}

/// One recipient's outcome in the dispatch report.
#[derive(Serialize, ToSchema)]
pub struct OutcomeView {
    pub address: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct NewsletterResponse {
    pub sent: usize,
    pub failed: usize,
    pub outcomes: Vec<OutcomeView>,
}

impl From<DispatchSummary> for NewsletterResponse {
    fn from(summary: DispatchSummary) -> Self {
        Self {
            sent: summary.sent,
            failed: summary.failed,
            outcomes: summary
                .outcomes
                .into_iter()
                .map(|o| OutcomeView {
                    address: o.address,
                    success: o.success,
                    error: o.error,
                })
                .collect(),
        }
    }
}

//=========================================================================================
// Handler
//=========================================================================================

/// POST /api/admin/newsletter - Send a message to every selected subscriber
///
/// The batch runs to completion even when individual sends fail; each
/// address's outcome is reported back. Only subscribers whose `selected`
/// flag is on are targeted.
#[utoipa::path(
    post,
    path = "/api/admin/newsletter",
    request_body = NewsletterRequest,
    responses(
        (status = 200, description = "Dispatch finished; see per-address outcomes", body = NewsletterResponse),
        (status = 400, description = "Blank subject/body or no selected subscribers"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn send_newsletter_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewsletterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let recipients = state
        .subscribers
        .selected_recipients()
        .await
        .map_err(|e| error_response("load newsletter recipients", e))?;

    let summary = state
        .dispatcher
        .send(&req.subject, &req.body, &recipients)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(NewsletterResponse::from(summary)))
}
