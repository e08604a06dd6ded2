pub mod auth;
pub mod middleware;
pub mod newsletter;
pub mod rest;
pub mod state;
pub mod subscribers;

use axum::http::StatusCode;
use reflections_core::ports::PortError;
use tracing::error;

// Re-export the admin middleware to make it easily accessible to the
// binary that will build the web server router.
pub use middleware::require_admin;

/// Maps a port error onto the HTTP error taxonomy.
///
/// Internal failures are logged here and reach the client only as a
/// generic message; user errors carry their descriptive text through.
pub(crate) fn error_response(context: &str, err: PortError) -> (StatusCode, String) {
    let status = match &err {
        PortError::Invalid(_) | PortError::Duplicate(_) => StatusCode::BAD_REQUEST,
        PortError::Unauthorized => StatusCode::UNAUTHORIZED,
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::Storage(_) | PortError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Failed to {context}: {err}");
        (status, format!("Failed to {context}"))
    } else {
        (status, err.to_string())
    }
}
