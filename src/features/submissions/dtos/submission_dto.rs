use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::submissions::services::{SessionState, SubmissionReceipt};

/// Submit-report request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportDto {
    /// Submitter name
    #[schema(example = "田中")]
    pub name: String,
    /// Report title
    #[schema(example = "空き家発見")]
    pub title: String,
    /// Free-form comment
    #[schema(example = "老朽化進行")]
    pub comment: String,
    /// Latitude in signed decimal degrees
    #[schema(example = "36.083333")]
    pub latitude: String,
    /// Longitude in signed decimal degrees
    #[schema(example = "136.216667")]
    pub longitude: String,
    /// The photo to attach to the record
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for a completed submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponseDto {
    /// Opaque file key the created record references
    pub asset_reference: String,
    pub latitude: f64,
    pub longitude: f64,
    pub submitted_at: DateTime<Utc>,
}

impl From<SubmissionReceipt> for SubmissionResponseDto {
    fn from(receipt: SubmissionReceipt) -> Self {
        Self {
            asset_reference: receipt.asset_reference,
            latitude: receipt.coordinate.latitude,
            longitude: receipt.coordinate.longitude,
            submitted_at: receipt.submitted_at,
        }
    }
}

/// Response DTO describing the submission session
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateDto {
    pub state: SessionState,
    /// Whether the submit control should be enabled
    pub accepts_submission: bool,
}

impl From<SessionState> for SessionStateDto {
    fn from(state: SessionState) -> Self {
        Self {
            state,
            accepts_submission: state.accepts_submission(),
        }
    }
}
