use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::submissions::handlers::{get_session, reset_session, submit_report};
use crate::features::submissions::services::SubmissionService;
use crate::shared::constants::MAX_PHOTO_SIZE;

/// Create routes for the submissions feature
pub fn routes(service: Arc<SubmissionService>) -> Router {
    Router::new()
        .route(
            "/api/reports/submit",
            // Allow body size up to MAX_PHOTO_SIZE + buffer for multipart overhead
            post(submit_report).layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE + 1024 * 1024)),
        )
        .route("/api/reports/session", get(get_session))
        .route("/api/reports/session/reset", post(reset_session))
        .with_state(service)
}
