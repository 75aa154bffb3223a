use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::previews::dtos::{BuildPreviewDto, MapPreviewDto};
use crate::features::previews::services::PreviewService;
use crate::shared::types::{ApiResponse, GeoCoordinate};

/// Build the map-preview payload for a pinned coordinate
///
/// The caller sends the committed form values (not every keystroke); the
/// response carries center, zoom, marker placement and popup content for the
/// map widget to render.
#[utoipa::path(
    post,
    path = "/api/previews",
    tag = "previews",
    request_body = BuildPreviewDto,
    responses(
        (status = 200, description = "Map preview built", body = ApiResponse<MapPreviewDto>),
        (status = 400, description = "Validation error")
    )
)]
pub async fn build_preview(
    State(service): State<Arc<PreviewService>>,
    AppJson(dto): AppJson<BuildPreviewDto>,
) -> Result<Json<ApiResponse<MapPreviewDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let coordinate =
        GeoCoordinate::new(dto.latitude, dto.longitude).map_err(AppError::Validation)?;

    let preview = service.build_preview(coordinate, dto);
    Ok(Json(ApiResponse::success(Some(preview), None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::features::previews::routes;

    fn test_server() -> TestServer {
        TestServer::new(routes::routes(Arc::new(PreviewService::new()))).unwrap()
    }

    #[tokio::test]
    async fn test_build_preview_centers_and_fills_popup() {
        let server = test_server();

        let response = server
            .post("/api/previews")
            .json(&json!({
                "latitude": 36.083333,
                "longitude": 136.216667,
                "name": "田中",
                "title": "空き家発見",
                "comment": "老朽化進行",
                "photoUrl": "blob:photo-1"
            }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        let preview = &body["data"];
        assert_eq!(preview["center"]["latitude"], 36.083333);
        assert_eq!(preview["zoom"], 15);
        assert_eq!(preview["marker"]["title"], "Location");
        assert_eq!(preview["popup"]["name"], "田中");
        assert_eq!(preview["popup"]["photoUrl"], "blob:photo-1");
    }

    #[tokio::test]
    async fn test_build_preview_rejects_out_of_range_coordinate() {
        let server = test_server();

        let response = server
            .post("/api/previews")
            .json(&json!({
                "latitude": 120.0,
                "longitude": 136.216667,
                "name": "田中",
                "title": "空き家発見",
                "comment": "老朽化進行"
            }))
            .await;
        response.assert_status_bad_request();
    }
}
