use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::KintoneConfig;
use crate::core::error::{AppError, Result};
use crate::modules::kintone::{RecordBackend, SubmissionRecord};

const API_TOKEN_HEADER: &str = "X-Cybozu-API-Token";

/// Response from the Kintone file upload endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileUploadResponse {
    file_key: String,
}

/// Response from the Kintone record creation endpoint
#[derive(Debug, Deserialize)]
struct RecordCreateResponse {
    id: String,
    revision: String,
}

/// HTTP client for the Kintone REST API (token-header auth).
///
/// A per-request timeout is set on the underlying client so a hung remote
/// call surfaces as the in-flight phase's failure instead of blocking the
/// submission flow indefinitely.
pub struct KintoneClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: String,
    app_id: String,
}

impl KintoneClient {
    pub fn new(config: KintoneConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token,
            app_id: config.app_id,
        })
    }

    fn describe_send_error(e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("request timed out: {}", e)
        } else {
            format!("request failed: {}", e)
        }
    }
}

#[async_trait]
impl RecordBackend for KintoneClient {
    async fn upload_asset(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String> {
        let url = format!("{}/k/v1/file.json", self.base_url);

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::BadRequest(format!("Invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::debug!("Uploading file to Kintone: {}", file_name);

        let response = self
            .http_client
            .post(&url)
            .header(API_TOKEN_HEADER, &self.api_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::AssetUpload(Self::describe_send_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Kintone file upload error: HTTP {} - {}", status, body);
            return Err(AppError::AssetUpload(format!(
                "Kintone returned HTTP {}",
                status
            )));
        }

        let parsed = response.json::<FileUploadResponse>().await.map_err(|e| {
            AppError::AssetUpload(format!("Malformed upload response: {}", e))
        })?;

        tracing::info!("File uploaded to Kintone: fileKey={}", parsed.file_key);
        Ok(parsed.file_key)
    }

    async fn create_record(&self, record: &SubmissionRecord) -> Result<()> {
        let url = format!("{}/k/v1/record.json", self.base_url);
        let payload = record.to_kintone_payload(&self.app_id);

        tracing::debug!("Creating Kintone record: title={}", record.title);

        let response = self
            .http_client
            .post(&url)
            .header(API_TOKEN_HEADER, &self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::RecordCreation(Self::describe_send_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Kintone record creation error: HTTP {} - {}", status, body);
            return Err(AppError::RecordCreation(format!(
                "Kintone returned HTTP {}",
                status
            )));
        }

        let created = response.json::<RecordCreateResponse>().await.map_err(|e| {
            AppError::RecordCreation(format!("Malformed record response: {}", e))
        })?;

        tracing::info!(
            "Kintone record created: id={}, revision={}",
            created.id,
            created.revision
        );
        Ok(())
    }
}
