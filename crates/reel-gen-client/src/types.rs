//! Generation service request/response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input of one image-to-video job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Remote URL of the source frame
    pub image_url: String,
    pub prompt: String,
    pub resolution: String,
    /// Clip length in whole seconds, sent as a string
    pub duration: String,
}

/// Response to a job submission.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmitResponse {
    pub request_id: String,
    #[serde(default)]
    pub status_url: Option<String>,
    #[serde(default)]
    pub response_url: Option<String>,
}

/// Status of a queued job.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub logs: Option<Vec<LogEntry>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LogEntry {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadInitiateRequest<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadInitiateResponse {
    pub upload_url: String,
    pub file_url: String,
}

/// Places a finished job may report its video URL, checked in order.
pub const VIDEO_URL_POINTERS: &[&str] = &["/video/url", "/data/video/url", "/video_url", "/url"];

/// First non-empty video URL found in a result payload.
pub fn extract_video_url(payload: &Value) -> Option<String> {
    VIDEO_URL_POINTERS
        .iter()
        .filter_map(|pointer| payload.pointer(pointer))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
}
