//! Seam between the orchestrator and the remote service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GenResult;
use crate::types::GenerationRequest;

/// Receives remote job log lines. Called off the polling path.
pub type LogCallback = Arc<dyn Fn(String) + Send + Sync>;

#[async_trait]
pub trait VideoGenerationService: Send + Sync {
    /// Upload an asset and return its remote URL.
    async fn upload_asset(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> GenResult<String>;

    /// Run a job to completion and return the URL of the generated video.
    async fn generate(&self, request: &GenerationRequest, on_log: LogCallback)
        -> GenResult<String>;
}
