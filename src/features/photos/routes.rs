use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::photos::handlers::extract_location;
use crate::features::photos::services::ExifLocationService;
use crate::shared::constants::MAX_PHOTO_SIZE;

/// Create routes for the photos feature
pub fn routes(service: Arc<ExifLocationService>) -> Router {
    Router::new()
        .route(
            "/api/photos/extract-location",
            // Allow body size up to MAX_PHOTO_SIZE + buffer for multipart overhead
            post(extract_location).layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE + 1024 * 1024)),
        )
        .with_state(service)
}
