//! Queue-based generation service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{GenError, GenResult};
use crate::service::{LogCallback, VideoGenerationService};
use crate::types::{
    extract_video_url, GenerationRequest, StatusResponse, SubmitResponse, UploadInitiateRequest,
    UploadInitiateResponse,
};

/// Configuration for the generation client.
#[derive(Debug, Clone)]
pub struct GenClientConfig {
    /// Base URL of the job queue API
    pub queue_url: String,
    /// Base URL of the asset storage API
    pub storage_url: String,
    /// Model / application id jobs are submitted to
    pub model: String,
    /// Service credential; calls fail with `NotConfigured` without it
    pub api_key: Option<String>,
    /// Delay between status polls
    pub poll_interval: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for GenClientConfig {
    fn default() -> Self {
        Self {
            queue_url: "https://queue.fal.run".to_string(),
            storage_url: "https://rest.alpha.fal.ai".to_string(),
            model: "fal-ai/kling-video/v2.1/standard/image-to-video".to_string(),
            api_key: None,
            poll_interval: Duration::from_millis(2000),
            timeout: Duration::from_secs(120),
        }
    }
}

impl GenClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            queue_url: std::env::var("REEL_GEN_QUEUE_URL")
                .unwrap_or(defaults.queue_url),
            storage_url: std::env::var("REEL_GEN_STORAGE_URL")
                .unwrap_or(defaults.storage_url),
            model: std::env::var("REEL_GEN_MODEL").unwrap_or(defaults.model),
            api_key: std::env::var("FAL_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            poll_interval: std::env::var("REEL_GEN_POLL_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
            timeout: std::env::var("REEL_GEN_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Client for the generation service.
pub struct GenClient {
    http: Client,
    config: GenClientConfig,
}

impl GenClient {
    /// Create a new client. A missing credential is not an error until a call is made.
    pub fn new(config: GenClientConfig) -> GenResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> GenResult<Self> {
        Self::new(GenClientConfig::from_env())
    }

    pub fn config(&self) -> &GenClientConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn auth_header(&self) -> GenResult<String> {
        self.config
            .api_key
            .as_deref()
            .map(|key| format!("Key {}", key))
            .ok_or_else(|| GenError::not_configured("FAL_KEY is not set"))
    }

    fn queue_base(&self) -> String {
        format!(
            "{}/{}",
            self.config.queue_url.trim_end_matches('/'),
            self.config.model.trim_matches('/')
        )
    }

    async fn submit(&self, auth: &str, request: &GenerationRequest) -> GenResult<SubmitResponse> {
        let url = self.queue_base();
        debug!("Submitting generation job to {}", url);

        let response = self
            .http
            .post(&url)
            .header("Authorization", auth)
            .json(request)
            .send()
            .await?;
        let response = ensure_success(response, "job submission").await?;

        let submitted: SubmitResponse = response.json().await?;
        if submitted.request_id.trim().is_empty() {
            return Err(GenError::InvalidResponse(
                "job submission returned an empty request_id".to_string(),
            ));
        }
        Ok(submitted)
    }

    /// Poll until the job is terminal, forwarding unseen log lines.
    async fn wait_for_completion(
        &self,
        auth: &str,
        status_url: &str,
        logs: &mpsc::UnboundedSender<String>,
    ) -> GenResult<()> {
        let mut forwarded = 0usize;

        loop {
            let response = self
                .http
                .get(status_url)
                .query(&[("logs", "1")])
                .header("Authorization", auth)
                .send()
                .await?;
            let response = ensure_success(response, "status poll").await?;
            let status: StatusResponse = response.json().await?;

            // The full log list is returned on every poll.
            let entries = status.logs.unwrap_or_default();
            for entry in entries.iter().skip(forwarded) {
                let line = entry.message.trim();
                if !line.is_empty() {
                    // Receiver only goes away once this function has returned.
                    let _ = logs.send(line.to_string());
                }
            }
            forwarded = forwarded.max(entries.len());

            match status.status.as_str() {
                "COMPLETED" => return Ok(()),
                "FAILED" | "ERROR" | "CANCELLED" => {
                    return Err(GenError::JobFailed(
                        status.error.unwrap_or_else(|| status.status.clone()),
                    ))
                }
                other => debug!(status = other, "Generation job pending"),
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    async fn fetch_result(&self, auth: &str, response_url: &str) -> GenResult<Value> {
        let response = self
            .http
            .get(response_url)
            .header("Authorization", auth)
            .send()
            .await?;
        let response = ensure_success(response, "result fetch").await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl VideoGenerationService for GenClient {
    async fn upload_asset(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> GenResult<String> {
        let auth = self.auth_header()?;
        let initiate_url = format!(
            "{}/storage/upload/initiate",
            self.config.storage_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&initiate_url)
            .header("Authorization", &auth)
            .json(&UploadInitiateRequest {
                file_name,
                content_type,
            })
            .send()
            .await?;
        let response = ensure_success(response, "upload initiation").await?;
        let target: UploadInitiateResponse = response.json().await?;

        let size = bytes.len();
        let response = self
            .http
            .put(&target.upload_url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;
        ensure_success(response, "asset upload").await?;

        info!(file_name, bytes = size, file_url = %target.file_url, "Uploaded asset");
        Ok(target.file_url)
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        on_log: LogCallback,
    ) -> GenResult<String> {
        let auth = self.auth_header()?;

        let submitted = self.submit(&auth, request).await?;
        let base = self.queue_base();
        let status_url = submitted
            .status_url
            .unwrap_or_else(|| format!("{}/requests/{}/status", base, submitted.request_id));
        let response_url = submitted
            .response_url
            .unwrap_or_else(|| format!("{}/requests/{}", base, submitted.request_id));

        info!(
            request_id = %submitted.request_id,
            duration = %request.duration,
            resolution = %request.resolution,
            "Generation job submitted"
        );

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let forwarder = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                on_log(line);
            }
        });

        let waited = self.wait_for_completion(&auth, &status_url, &tx).await;
        drop(tx);
        if let Err(e) = forwarder.await {
            warn!("Log forwarder task failed: {}", e);
        }
        waited?;

        let payload = self.fetch_result(&auth, &response_url).await?;
        let video_url = extract_video_url(&payload).ok_or(GenError::NoVideoUrl)?;

        info!(
            request_id = %submitted.request_id,
            video_url = %video_url,
            "Generation job completed"
        );
        Ok(video_url)
    }
}

/// Turn a non-success status into `RequestFailed` with the response body.
async fn ensure_success(response: Response, what: &str) -> GenResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(GenError::RequestFailed(format!(
        "{} returned {}: {}",
        what, status, body
    )))
}
