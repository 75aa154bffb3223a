use utoipa::{Modify, OpenApi};

use crate::features::photos::{dtos as photos_dtos, handlers as photos_handlers};
use crate::features::previews::{dtos as previews_dtos, handlers as previews_handlers};
use crate::features::submissions::services::SessionState;
use crate::features::submissions::{dtos as submissions_dtos, handlers as submissions_handlers};
use crate::shared::types::{ApiResponse, GeoCoordinate};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Photos
        photos_handlers::photo_handler::extract_location,
        // Reports
        submissions_handlers::submission_handler::submit_report,
        submissions_handlers::submission_handler::get_session,
        submissions_handlers::submission_handler::reset_session,
        // Previews
        previews_handlers::preview_handler::build_preview,
    ),
    components(
        schemas(
            // Shared
            GeoCoordinate,
            // Photos
            photos_dtos::ExtractLocationDto,
            photos_dtos::ExtractedLocationDto,
            ApiResponse<photos_dtos::ExtractedLocationDto>,
            // Reports
            SessionState,
            submissions_dtos::SubmitReportDto,
            submissions_dtos::SubmissionResponseDto,
            submissions_dtos::SessionStateDto,
            ApiResponse<submissions_dtos::SubmissionResponseDto>,
            ApiResponse<submissions_dtos::SessionStateDto>,
            // Previews
            previews_dtos::BuildPreviewDto,
            previews_dtos::MarkerDto,
            previews_dtos::PopupContentDto,
            previews_dtos::MapPreviewDto,
            ApiResponse<previews_dtos::MapPreviewDto>,
        )
    ),
    tags(
        (name = "photos", description = "Photo geotag extraction"),
        (name = "reports", description = "Report submission to the record-storage backend"),
        (name = "previews", description = "Map preview payloads"),
    ),
    info(
        title = "Akiya Report API",
        version = "0.1.0",
        description = "API documentation for the vacant-house report submission service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
