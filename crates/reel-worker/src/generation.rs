//! Generation orchestrator.
//!
//! Turns an anchor reference into something the remote service accepts,
//! submits the job and hands back the remote video URL. Remote URLs pass
//! through untouched; `/uploads/<file>` references are read from the
//! storage root and uploaded first.

use std::path::Path;
use std::sync::Arc;

use reel_gen_client::{GenerationRequest, LogCallback, VideoGenerationService};
use reel_media::{MediaReference, StorageRoot};
use reel_models::{clamp_generation_duration, GENERATION_RESOLUTION};

use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;

/// MIME type for an uploaded anchor image, by file extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Submits generation jobs on behalf of the shot pipeline.
#[derive(Clone)]
pub struct ShotGenerator {
    service: Arc<dyn VideoGenerationService>,
    storage: StorageRoot,
}

impl ShotGenerator {
    pub fn new(service: Arc<dyn VideoGenerationService>, storage: StorageRoot) -> Self {
        Self { service, storage }
    }

    /// Resolve an image reference to a URL the remote service can fetch.
    pub async fn resolve_image_url(&self, reference: &str) -> WorkerResult<String> {
        match MediaReference::parse(reference)? {
            MediaReference::Remote(url) => Ok(url),
            MediaReference::Local(filename) => {
                let path = self.storage.existing_file(&filename).await?;
                let bytes = tokio::fs::read(&path).await?;
                let url = self
                    .service
                    .upload_asset(bytes, &filename, content_type_for(&filename))
                    .await?;
                Ok(url)
            }
        }
    }

    /// Generate one clip and return its remote URL.
    ///
    /// `duration_seconds` is clamped to the service's accepted range. Remote
    /// log lines go to `logger`; nothing is retried here.
    pub async fn generate_clip(
        &self,
        image_reference: &str,
        prompt: &str,
        duration_seconds: f64,
        logger: &JobLogger,
    ) -> WorkerResult<String> {
        if image_reference.trim().is_empty() {
            return Err(WorkerError::invalid_input("source image reference is empty"));
        }

        let image_url = self.resolve_image_url(image_reference).await?;
        let request = GenerationRequest {
            image_url,
            prompt: prompt.to_string(),
            resolution: GENERATION_RESOLUTION.to_string(),
            duration: clamp_generation_duration(duration_seconds).to_string(),
        };

        logger.log_progress(&format!(
            "submitting {}s {} generation",
            request.duration, request.resolution
        ));

        let sink = logger.clone();
        let on_log: LogCallback = Arc::new(move |line: String| sink.log_remote(&line));

        match self.service.generate(&request, on_log).await {
            Ok(url) => {
                metrics::counter!("reel_generation_jobs_total", "outcome" => "success")
                    .increment(1);
                Ok(url)
            }
            Err(e) => {
                metrics::counter!("reel_generation_jobs_total", "outcome" => "failure")
                    .increment(1);
                logger.log_error(&format!("generation failed: {}", e));
                Err(e.into())
            }
        }
    }
}
