use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::types::GeoCoordinate;

/// Extract-location request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ExtractLocationDto {
    /// The photo to read the geotag from
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO carrying the extracted coordinate
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLocationDto {
    /// Latitude in signed decimal degrees, 6 decimal places
    pub latitude: f64,
    /// Longitude in signed decimal degrees, 6 decimal places
    pub longitude: f64,
}

impl From<GeoCoordinate> for ExtractedLocationDto {
    fn from(coordinate: GeoCoordinate) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        }
    }
}
