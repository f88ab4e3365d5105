//! Generation client error types.

use thiserror::Error;

pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Generation service not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Generation job failed: {0}")]
    JobFailed(String),

    #[error("No video URL returned by generation service")]
    NoVideoUrl,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenError {
    pub fn not_configured(msg: impl Into<String>) -> Self {
        Self::NotConfigured(msg.into())
    }

    /// Whether a caller-level retry could succeed. The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenError::Network(_) | GenError::RequestFailed(_))
    }
}
