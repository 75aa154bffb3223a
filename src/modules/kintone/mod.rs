//! Kintone record-storage backend
//!
//! Two operations: upload a file (returns an opaque file key) and create a
//! record referencing an uploaded file. Authentication uses an app-scoped
//! API token in the `X-Cybozu-API-Token` header.

mod kintone_client;

pub use kintone_client::KintoneClient;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::shared::types::GeoCoordinate;

/// A report record as sent to the storage backend.
///
/// Built only after a successful asset upload and never mutated afterwards;
/// there is no local persistence of submitted records.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub submitter_name: String,
    pub title: String,
    pub comment: String,
    pub coordinate: GeoCoordinate,
    /// Opaque file key issued by the backend's upload operation
    pub asset_reference: String,
}

impl SubmissionRecord {
    /// Build the Kintone `record.json` request body.
    ///
    /// Every field is wrapped in `{"value": ...}`; latitude/longitude are sent
    /// as decimal strings of the 6-dp-rounded values; the photo field carries
    /// the file key from the upload phase.
    pub fn to_kintone_payload(&self, app_id: &str) -> serde_json::Value {
        serde_json::json!({
            "app": app_id,
            "record": {
                "name": { "value": self.submitter_name },
                "title": { "value": self.title },
                "comment": { "value": self.comment },
                "latitude": { "value": self.coordinate.latitude.to_string() },
                "longitude": { "value": self.coordinate.longitude.to_string() },
                "photo": { "value": [{ "fileKey": self.asset_reference }] },
            }
        })
    }
}

/// Record-storage backend operations used by the submission coordinator.
///
/// Hidden behind a trait so the two-phase sequencing can be exercised against
/// a test double.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Upload raw file content; returns the opaque asset reference.
    async fn upload_asset(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String>;

    /// Create a record referencing a previously uploaded asset.
    async fn create_record(&self, record: &SubmissionRecord) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kintone_payload_shape() {
        let record = SubmissionRecord {
            submitter_name: "田中".to_string(),
            title: "空き家発見".to_string(),
            comment: "老朽化進行".to_string(),
            coordinate: GeoCoordinate::new(36.083333, 136.216667).unwrap(),
            asset_reference: "abc123".to_string(),
        };

        let payload = record.to_kintone_payload("42");

        assert_eq!(
            payload,
            serde_json::json!({
                "app": "42",
                "record": {
                    "name": { "value": "田中" },
                    "title": { "value": "空き家発見" },
                    "comment": { "value": "老朽化進行" },
                    "latitude": { "value": "36.083333" },
                    "longitude": { "value": "136.216667" },
                    "photo": { "value": [{ "fileKey": "abc123" }] },
                }
            })
        );
    }
}
