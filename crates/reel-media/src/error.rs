//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while fetching, normalizing or assembling clips.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found: {0}")]
    FfmpegNotFound(String),

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
        /// Index of the clip being processed, when the failure is clip-specific
        clip_index: Option<usize>,
    },

    #[error("Download failed: {message}")]
    DownloadFailed { message: String },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unsupported media reference: {0}")]
    UnsupportedReference(String),

    #[error("Invalid output filename: {0}")]
    InvalidOutputName(String),

    #[error("No clips supplied for {0}")]
    EmptyInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
            clip_index: None,
        }
    }

    /// Create an FFmpeg failure error tied to one clip of a build.
    pub fn clip_failed(
        clip_index: usize,
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
            clip_index: Some(clip_index),
        }
    }

    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// Create an unsupported reference error.
    pub fn unsupported_reference(reference: impl Into<String>) -> Self {
        Self::UnsupportedReference(reference.into())
    }

    /// Clip index carried by a per-clip FFmpeg failure.
    pub fn clip_index(&self) -> Option<usize> {
        match self {
            Self::FfmpegFailed { clip_index, .. } => *clip_index,
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry the whole operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DownloadFailed { .. } | Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_failure_carries_index() {
        let err = MediaError::clip_failed(2, "Normalization failed for clip 2", None, Some(1));
        assert_eq!(err.clip_index(), Some(2));
        assert!(err.to_string().contains("clip 2"));
        assert!(!err.is_retryable());

        let err = MediaError::ffmpeg_failed("Concatenation failed", None, Some(1));
        assert_eq!(err.clip_index(), None);
    }
}
