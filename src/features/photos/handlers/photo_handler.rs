use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::photos::dtos::{ExtractLocationDto, ExtractedLocationDto};
use crate::features::photos::services::ExifLocationService;
use crate::shared::constants::{is_image_mime_type, ALLOWED_IMAGE_MIME_TYPES, MAX_PHOTO_SIZE};
use crate::shared::types::ApiResponse;

/// Extract the geotag coordinate from an uploaded photo
///
/// Accepts multipart/form-data with a single `file` field. A photo without a
/// readable geotag is a 404, not a server error - the user has to pick a photo
/// that carries location data.
#[utoipa::path(
    post,
    path = "/api/photos/extract-location",
    tag = "photos",
    request_body(
        content = ExtractLocationDto,
        content_type = "multipart/form-data",
        description = "Photo upload form",
    ),
    responses(
        (status = 200, description = "Coordinate extracted", body = ApiResponse<ExtractedLocationDto>),
        (status = 400, description = "Invalid upload"),
        (status = 404, description = "No location data embedded in the photo"),
        (status = 413, description = "Photo too large")
    )
)]
pub async fn extract_location(
    State(service): State<Arc<ExifLocationService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ExtractedLocationDto>>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let ct = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
                content_type = Some(ct);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data = file_data.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    let content_type =
        content_type.ok_or_else(|| AppError::BadRequest("Content type is required".to_string()))?;

    if file_data.len() > MAX_PHOTO_SIZE {
        return Err(AppError::BadRequest(format!(
            "Photo too large. Maximum size is {} bytes ({} MB)",
            MAX_PHOTO_SIZE,
            MAX_PHOTO_SIZE / 1024 / 1024
        )));
    }

    if !is_image_mime_type(&content_type) {
        return Err(AppError::BadRequest(format!(
            "File type '{}' is not allowed. Allowed types: {}",
            content_type,
            ALLOWED_IMAGE_MIME_TYPES.join(", ")
        )));
    }

    let coordinate = service.extract_coordinate(&file_data).ok_or_else(|| {
        AppError::NotFound("No location data was found in the photo".to_string())
    })?;

    tracing::info!(
        "Geotag extracted: lat={}, lon={}",
        coordinate.latitude,
        coordinate.longitude
    );

    Ok(Json(ApiResponse::success(
        Some(coordinate.into()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;

    use crate::features::photos::routes;
    use crate::shared::test_helpers::{tiff_with_gps, tiff_without_gps};

    fn test_server() -> TestServer {
        let service = Arc::new(ExifLocationService::new());
        TestServer::new(routes::routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_extract_location_returns_coordinate() {
        let server = test_server();
        let image = tiff_with_gps(
            [(36, 1), (5, 1), (0, 1)],
            "N",
            [(136, 1), (13, 1), (0, 1)],
            "E",
        );

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(image).file_name("photo.tif").mime_type("image/tiff"),
        );

        let response = server.post("/api/photos/extract-location").multipart(form).await;
        response.assert_status_ok();

        let body: ApiResponse<ExtractedLocationDto> = response.json();
        let location = body.data.unwrap();
        assert_eq!(location.latitude, 36.083333);
        assert_eq!(location.longitude, 136.216667);
    }

    #[tokio::test]
    async fn test_extract_location_without_geotag_is_not_found() {
        let server = test_server();

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(tiff_without_gps())
                .file_name("photo.tif")
                .mime_type("image/tiff"),
        );

        let response = server.post("/api/photos/extract-location").multipart(form).await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_extract_location_rejects_missing_file() {
        let server = test_server();

        let form = MultipartForm::new().add_text("note", "no file here");
        let response = server.post("/api/photos/extract-location").multipart(form).await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_extract_location_rejects_disallowed_mime_type() {
        let server = test_server();

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"%PDF-1.4".to_vec())
                .file_name("doc.pdf")
                .mime_type("application/pdf"),
        );

        let response = server.post("/api/photos/extract-location").multipart(form).await;
        response.assert_status_bad_request();
    }
}
