use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::previews::handlers::build_preview;
use crate::features::previews::services::PreviewService;

/// Create routes for the previews feature
pub fn routes(service: Arc<PreviewService>) -> Router {
    Router::new()
        .route("/api/previews", post(build_preview))
        .with_state(service)
}
