use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::submissions::models::PhotoAsset;
use crate::modules::kintone::{RecordBackend, SubmissionRecord};
use crate::shared::types::GeoCoordinate;

/// Submission session state machine.
///
/// `Idle -> Uploading -> RecordCreating -> Complete`, with `Failed` reachable
/// from either in-flight state. A new submission is accepted only from `Idle`
/// or `Failed`; `Complete` is terminal until an explicit session reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Uploading,
    RecordCreating,
    Complete,
    Failed,
}

impl SessionState {
    pub fn accepts_submission(&self) -> bool {
        matches!(self, SessionState::Idle | SessionState::Failed)
    }
}

/// The report form fields, validated before any remote call is made.
#[derive(Debug, Clone, Validate)]
pub struct ReportFields {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "Comment must be 1-5000 characters"))]
    pub comment: String,
}

/// Outcome of a completed two-phase submission
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub asset_reference: String,
    pub coordinate: GeoCoordinate,
    pub submitted_at: DateTime<Utc>,
}

/// Coordinates the two-phase write against the record-storage backend.
///
/// Strictly sequential: the record-creation phase never starts before the
/// upload phase has resolved, and only one submission may be in flight at a
/// time. A failed phase-2 does not roll back phase 1 - the orphaned asset is
/// an accepted residual state.
pub struct SubmissionService {
    backend: Arc<dyn RecordBackend>,
    state: Mutex<SessionState>,
}

impl SubmissionService {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(SessionState::Idle),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// Discard all session state and return to `Idle`.
    ///
    /// This is the explicit user action that leaves the terminal confirmation
    /// view; there is no other way out of `Complete`.
    pub fn reset(&self) -> SessionState {
        self.set_state(SessionState::Idle);
        SessionState::Idle
    }

    fn set_state(&self, next: SessionState) {
        *self.state.lock().unwrap() = next;
    }

    /// Run the two-phase submission.
    ///
    /// Preconditions are checked before any network traffic: the fields must
    /// validate and both the coordinate and the photo must be present. A
    /// retry after `Failed` restarts both phases from scratch.
    pub async fn submit(
        &self,
        fields: ReportFields,
        coordinate: Option<GeoCoordinate>,
        asset: Option<PhotoAsset>,
    ) -> Result<SubmissionReceipt> {
        fields
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let (coordinate, asset) = match (coordinate, asset) {
            (Some(coordinate), Some(asset)) => (coordinate, asset),
            _ => {
                return Err(AppError::Validation(
                    "All fields, a photo, and its location data are required".to_string(),
                ))
            }
        };

        {
            let mut state = self.state.lock().unwrap();
            if !state.accepts_submission() {
                return Err(AppError::Conflict(format!(
                    "A submission is already in progress or complete (state: {:?})",
                    *state
                )));
            }
            *state = SessionState::Uploading;
        }

        match self.run_phases(fields, coordinate, asset).await {
            Ok(receipt) => {
                self.set_state(SessionState::Complete);
                Ok(receipt)
            }
            Err(e) => {
                self.set_state(SessionState::Failed);
                Err(e)
            }
        }
    }

    async fn run_phases(
        &self,
        fields: ReportFields,
        coordinate: GeoCoordinate,
        asset: PhotoAsset,
    ) -> Result<SubmissionReceipt> {
        tracing::info!("Submission phase 1: uploading {}", asset.file_name);
        let asset_reference = self
            .backend
            .upload_asset(&asset.file_name, &asset.content_type, asset.data)
            .await?;

        self.set_state(SessionState::RecordCreating);

        tracing::info!(
            "Submission phase 2: creating record (fileKey={})",
            asset_reference
        );
        let record = SubmissionRecord {
            submitter_name: fields.name,
            title: fields.title,
            comment: fields.comment,
            coordinate,
            asset_reference: asset_reference.clone(),
        };
        self.backend.create_record(&record).await?;

        Ok(SubmissionReceipt {
            asset_reference,
            coordinate,
            submitted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::MockRecordBackend;

    fn fields() -> ReportFields {
        ReportFields {
            name: "田中".to_string(),
            title: "空き家発見".to_string(),
            comment: "老朽化進行".to_string(),
        }
    }

    fn coordinate() -> GeoCoordinate {
        GeoCoordinate::new(36.083333, 136.216667).unwrap()
    }

    fn asset() -> PhotoAsset {
        PhotoAsset {
            file_name: "photo.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: vec![0xFF, 0xD8, 0xFF],
        }
    }

    #[tokio::test]
    async fn test_missing_asset_never_reaches_the_backend() {
        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let service = SubmissionService::new(backend.clone());

        let result = service.submit(fields(), Some(coordinate()), None).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(backend.upload_call_count(), 0);
        assert_eq!(backend.record_call_count(), 0);
        assert_eq!(service.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_missing_coordinate_never_reaches_the_backend() {
        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let service = SubmissionService::new(backend.clone());

        let result = service.submit(fields(), None, Some(asset())).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(backend.upload_call_count(), 0);
        assert_eq!(backend.record_call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_fields_never_reach_the_backend() {
        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let service = SubmissionService::new(backend.clone());

        let empty = ReportFields {
            name: String::new(),
            title: String::new(),
            comment: String::new(),
        };
        let result = service.submit(empty, Some(coordinate()), Some(asset())).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(backend.upload_call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_failure_skips_record_creation() {
        let backend = Arc::new(MockRecordBackend::failing_upload());
        let service = SubmissionService::new(backend.clone());

        let result = service
            .submit(fields(), Some(coordinate()), Some(asset()))
            .await;

        assert!(matches!(result, Err(AppError::AssetUpload(_))));
        assert_eq!(backend.upload_call_count(), 1);
        assert_eq!(backend.record_call_count(), 0);
        assert_eq!(service.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn test_record_failure_after_upload_does_not_complete() {
        let backend = Arc::new(MockRecordBackend::failing_record_creation("abc123"));
        let service = SubmissionService::new(backend.clone());

        let result = service
            .submit(fields(), Some(coordinate()), Some(asset()))
            .await;

        assert!(matches!(result, Err(AppError::RecordCreation(_))));
        assert_eq!(backend.upload_call_count(), 1);
        assert_eq!(backend.record_call_count(), 1);
        // Phase 1 is not rolled back; the session just never reaches Complete
        assert_eq!(service.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn test_successful_submission_sends_the_exact_record() {
        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let service = SubmissionService::new(backend.clone());

        let receipt = service
            .submit(fields(), Some(coordinate()), Some(asset()))
            .await
            .unwrap();

        assert_eq!(receipt.asset_reference, "abc123");
        assert_eq!(service.state(), SessionState::Complete);

        let record = backend.last_record.lock().unwrap().clone().unwrap();
        assert_eq!(
            record,
            SubmissionRecord {
                submitter_name: "田中".to_string(),
                title: "空き家発見".to_string(),
                comment: "老朽化進行".to_string(),
                coordinate: coordinate(),
                asset_reference: "abc123".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_complete_session_rejects_further_submissions() {
        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let service = SubmissionService::new(backend.clone());

        service
            .submit(fields(), Some(coordinate()), Some(asset()))
            .await
            .unwrap();

        let second = service
            .submit(fields(), Some(coordinate()), Some(asset()))
            .await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(backend.upload_call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_session_allows_retry_from_scratch() {
        let backend = Arc::new(MockRecordBackend::failing_record_creation("abc123"));
        let service = SubmissionService::new(backend.clone());

        let first = service
            .submit(fields(), Some(coordinate()), Some(asset()))
            .await;
        assert!(first.is_err());

        // Retry restarts both phases; the double fails phase 2 again but the
        // upload phase ran a second time from scratch.
        let second = service
            .submit(fields(), Some(coordinate()), Some(asset()))
            .await;
        assert!(second.is_err());
        assert_eq!(backend.upload_call_count(), 2);
        assert_eq!(backend.record_call_count(), 2);
    }

    #[tokio::test]
    async fn test_reset_discards_the_terminal_state() {
        let backend = Arc::new(MockRecordBackend::succeeding("abc123"));
        let service = SubmissionService::new(backend.clone());

        service
            .submit(fields(), Some(coordinate()), Some(asset()))
            .await
            .unwrap();
        assert_eq!(service.state(), SessionState::Complete);

        assert_eq!(service.reset(), SessionState::Idle);

        service
            .submit(fields(), Some(coordinate()), Some(asset()))
            .await
            .unwrap();
        assert_eq!(backend.upload_call_count(), 2);
    }
}
