//! HTTP client for the palm-ra API
//!
//! Uploads an image, then polls the status endpoint at a fixed interval until
//! the analysis leaves `processing`.

use anyhow::{bail, Context, Result};
use palm_common::AnalysisStatus;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use uuid::Uuid;

use crate::api::{AnalysisResponse, UploadResponse};
use crate::api::analysis::UPLOAD_FIELD;

/// Default polling interval between status requests
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Client for one palm-ra server
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /api/upload
    pub async fn upload(
        &self,
        image: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<Uuid> {
        let part = Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .with_context(|| format!("Invalid content type: {}", content_type))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .http
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await
            .context("Upload request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Failed to upload image ({}): {}", status, body);
        }

        let upload: UploadResponse = response
            .json()
            .await
            .context("Invalid upload response")?;
        Ok(upload.id)
    }

    /// GET /api/analysis/:id
    pub async fn get_analysis(&self, id: Uuid) -> Result<AnalysisResponse> {
        let response = self
            .http
            .get(self.url(&format!("/api/analysis/{}", id)))
            .send()
            .await
            .context("Status request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Failed to get analysis {} ({}): {}", id, status, body);
        }

        response
            .json()
            .await
            .context("Invalid analysis response")
    }

    /// Poll until the analysis is `completed` or `error`
    ///
    /// `on_progress` sees every polled snapshot, including the last one.
    pub async fn wait_for_result<F>(&self, id: Uuid, mut on_progress: F) -> Result<AnalysisResponse>
    where
        F: FnMut(&AnalysisResponse),
    {
        loop {
            let analysis = self.get_analysis(id).await?;
            on_progress(&analysis);

            if analysis.status != AnalysisStatus::Processing {
                return Ok(analysis);
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Guess an image content type from a file extension
pub fn content_type_for_path(path: &std::path::Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}
