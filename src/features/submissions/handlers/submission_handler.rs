use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::submissions::dtos::{
    SessionStateDto, SubmissionResponseDto, SubmitReportDto,
};
use crate::features::submissions::models::PhotoAsset;
use crate::features::submissions::services::{ReportFields, SubmissionService};
use crate::shared::constants::{is_image_mime_type, ALLOWED_IMAGE_MIME_TYPES, MAX_PHOTO_SIZE};
use crate::shared::types::{ApiResponse, GeoCoordinate};

/// Submit a report to the record-storage backend
///
/// Accepts multipart/form-data with `name`, `title`, `comment`, `latitude`,
/// `longitude` and `file` fields. Runs the two-phase write: the photo is
/// uploaded first, then a record referencing it is created. A failure in
/// either phase aborts the flow with a phase-tagged error.
#[utoipa::path(
    post,
    path = "/api/reports/submit",
    tag = "reports",
    request_body(
        content = SubmitReportDto,
        content_type = "multipart/form-data",
        description = "Report form fields plus the geotagged photo",
    ),
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<SubmissionResponseDto>),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "A submission is already in progress or complete"),
        (status = 502, description = "Asset upload or record creation failed")
    )
)]
pub async fn submit_report(
    State(service): State<Arc<SubmissionService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponseDto>>)> {
    let mut name = String::new();
    let mut title = String::new();
    let mut comment = String::new();
    let mut latitude: Option<f64> = None;
    let mut longitude: Option<f64> = None;
    let mut asset: Option<PhotoAsset> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => name = read_text(field, "name").await?,
            "title" => title = read_text(field, "title").await?,
            "comment" => comment = read_text(field, "comment").await?,
            "latitude" => latitude = Some(read_decimal(field, "latitude").await?),
            "longitude" => longitude = Some(read_decimal(field, "longitude").await?),
            "file" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                if data.len() > MAX_PHOTO_SIZE {
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

                asset = Some(PhotoAsset {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let coordinate = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(
            GeoCoordinate::new(latitude, longitude).map_err(AppError::Validation)?,
        ),
        _ => None,
    };

    let fields = ReportFields {
        name,
        title,
        comment,
    };

    let receipt = service.submit(fields, coordinate, asset).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(receipt.into()),
            Some("フォームの送信が完了しました！".to_string()),
        )),
    ))
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

async fn read_decimal(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<f64> {
    let text = read_text(field, name).await?;
    text.trim()
        .parse::<f64>()
        .map_err(|_| AppError::Validation(format!("{} must be a decimal number", name)))
}

/// Get the current submission session state
///
/// Lets the client disable the submit control while a submission is in
/// flight or after it has completed.
#[utoipa::path(
    get,
    path = "/api/reports/session",
    tag = "reports",
    responses(
        (status = 200, description = "Current session state", body = ApiResponse<SessionStateDto>)
    )
)]
pub async fn get_session(
    State(service): State<Arc<SubmissionService>>,
) -> Result<Json<ApiResponse<SessionStateDto>>> {
    Ok(Json(ApiResponse::success(
        Some(service.state().into()),
        None,
    )))
}

/// Reset the submission session
///
/// The explicit user action that leaves the confirmation view: discards all
/// session state and returns to `idle`.
#[utoipa::path(
    post,
    path = "/api/reports/session/reset",
    tag = "reports",
    responses(
        (status = 200, description = "Session reset to idle", body = ApiResponse<SessionStateDto>)
    )
)]
pub async fn reset_session(
    State(service): State<Arc<SubmissionService>>,
) -> Result<Json<ApiResponse<SessionStateDto>>> {
    let state = service.reset();
    tracing::info!("Submission session reset");

    Ok(Json(ApiResponse::success(
        Some(state.into()),
        Some("Session reset".to_string()),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;

    use crate::features::photos::ExifLocationService;
    use crate::features::submissions::routes;
    use crate::shared::test_helpers::{tiff_with_gps, MockRecordBackend};

    fn test_server(backend: Arc<MockRecordBackend>) -> TestServer {
        let service = Arc::new(SubmissionService::new(backend));
        TestServer::new(routes::routes(service)).unwrap()
    }

    fn report_form(latitude: &str, longitude: &str, photo: Vec<u8>) -> MultipartForm {
        MultipartForm::new()
            .add_text("name", "田中")
            .add_text("title", "空き家発見")
            .add_text("comment", "老朽化進行")
            .add_text("latitude", latitude)
            .add_text("longitude", longitude)
            .add_part(
                "file",
                Part::bytes(photo).file_name("photo.tif").mime_type("image/tiff"),
            )
    }

    #[tokio::test]
    async fn test_full_flow_from_geotagged_photo_to_record() {
        // Extract the coordinate the way the client does, then submit it.
        let photo = tiff_with_gps(
            [(36, 1), (5, 1), (0, 1)],
            "N",
            [(136, 1), (13, 1), (0, 1)],
            "E",
        );
        let coordinate = ExifLocationService::new()
            .extract_coordinate(&photo)
            .unwrap();

        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let server = test_server(backend.clone());

        let response = server
            .post("/api/reports/submit")
            .multipart(report_form(
                &coordinate.latitude.to_string(),
                &coordinate.longitude.to_string(),
                photo,
            ))
            .await;
        response.assert_status(StatusCode::CREATED);

        let record = backend.last_record.lock().unwrap().clone().unwrap();
        assert_eq!(record.submitter_name, "田中");
        assert_eq!(record.title, "空き家発見");
        assert_eq!(record.comment, "老朽化進行");
        assert_eq!(record.coordinate.latitude, 36.083333);
        assert_eq!(record.coordinate.longitude, 136.216667);
        assert_eq!(record.asset_reference, "abc123");

        let payload = record.to_kintone_payload("7");
        assert_eq!(payload["record"]["latitude"]["value"], "36.083333");
        assert_eq!(payload["record"]["longitude"]["value"], "136.216667");

        // Session has reached the terminal state
        let session = server.get("/api/reports/session").await;
        session.assert_status_ok();
        assert_eq!(session.json::<serde_json::Value>()["data"]["state"], "complete");
    }

    #[tokio::test]
    async fn test_submit_without_photo_is_a_validation_failure() {
        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let server = test_server(backend.clone());

        let form = MultipartForm::new()
            .add_text("name", "田中")
            .add_text("title", "空き家発見")
            .add_text("comment", "老朽化進行")
            .add_text("latitude", "36.083333")
            .add_text("longitude", "136.216667");

        let response = server.post("/api/reports/submit").multipart(form).await;
        response.assert_status_bad_request();
        assert_eq!(backend.upload_call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_without_coordinate_is_a_validation_failure() {
        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let server = test_server(backend.clone());

        let form = MultipartForm::new()
            .add_text("name", "田中")
            .add_text("title", "空き家発見")
            .add_text("comment", "老朽化進行")
            .add_part(
                "file",
                Part::bytes(vec![0xFF, 0xD8]).file_name("p.jpg").mime_type("image/jpeg"),
            );

        let response = server.post("/api/reports/submit").multipart(form).await;
        response.assert_status_bad_request();
        assert_eq!(backend.upload_call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_failure_surfaces_as_bad_gateway() {
        let backend = Arc::new(MockRecordBackend::failing_upload());
        let server = test_server(backend.clone());

        let response = server
            .post("/api/reports/submit")
            .multipart(report_form("36.083333", "136.216667", vec![0xFF, 0xD8]))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(backend.record_call_count(), 0);

        // Failed is retriable
        let session = server.get("/api/reports/session").await;
        assert_eq!(
            session.json::<serde_json::Value>()["data"]["acceptsSubmission"],
            true
        );
    }

    #[tokio::test]
    async fn test_out_of_range_coordinate_is_rejected() {
        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let server = test_server(backend.clone());

        let response = server
            .post("/api/reports/submit")
            .multipart(report_form("91.0", "136.216667", vec![0xFF, 0xD8]))
            .await;

        response.assert_status_bad_request();
        assert_eq!(backend.upload_call_count(), 0);
    }

    #[tokio::test]
    async fn test_session_reset_returns_to_idle() {
        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let server = test_server(backend.clone());

        server
            .post("/api/reports/submit")
            .multipart(report_form("36.083333", "136.216667", vec![0xFF, 0xD8]))
            .await
            .assert_status(StatusCode::CREATED);

        let reset = server.post("/api/reports/session/reset").await;
        reset.assert_status_ok();
        assert_eq!(reset.json::<serde_json::Value>()["data"]["state"], "idle");
    }
}
