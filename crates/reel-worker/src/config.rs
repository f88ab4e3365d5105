//! Worker configuration.

use reel_continuity::{normalize_threshold, DEFAULT_THRESHOLD};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Directory local media is read from and outputs are written to
    pub storage_root: String,
    /// Continuity threshold used when a shot request carries none
    pub continuity_threshold: f64,
    /// FFmpeg binary name or path
    pub ffmpeg_bin: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            storage_root: "./uploads".to_string(),
            continuity_threshold: DEFAULT_THRESHOLD,
            ffmpeg_bin: "ffmpeg".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            storage_root: std::env::var("REEL_STORAGE_ROOT")
                .unwrap_or_else(|_| "./uploads".to_string()),
            continuity_threshold: normalize_threshold(
                std::env::var("REEL_CONTINUITY_THRESHOLD")
                    .ok()
                    .and_then(|s| s.trim().parse().ok()),
            ),
            ffmpeg_bin: std::env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()),
        }
    }
}
