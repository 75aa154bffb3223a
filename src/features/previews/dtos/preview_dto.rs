use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::types::GeoCoordinate;

/// Request DTO for building a map preview from committed form values
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildPreviewDto {
    /// Latitude in signed decimal degrees
    #[schema(example = 36.083333)]
    pub latitude: f64,

    /// Longitude in signed decimal degrees
    #[schema(example = 136.216667)]
    pub longitude: f64,

    /// Submitter name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Report title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Free-form comment
    #[validate(length(min = 1, max = 5000, message = "Comment must be 1-5000 characters"))]
    pub comment: String,

    /// Preview image URL shown in the popup (object URL or hosted)
    #[validate(length(max = 2048, message = "Photo URL must not exceed 2048 characters"))]
    pub photo_url: Option<String>,
}

/// Marker placement on the preview map
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDto {
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
}

/// Popup content shown above the marker
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopupContentDto {
    pub name: String,
    pub title: String,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Response DTO for a built map preview
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapPreviewDto {
    pub center: GeoCoordinate,
    pub zoom: u8,
    pub marker: MarkerDto,
    pub popup: PopupContentDto,
}
