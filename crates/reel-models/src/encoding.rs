//! Clip normalization and generation constants.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Normalized clip width
pub const TARGET_WIDTH: u32 = 1280;
/// Normalized clip height
pub const TARGET_HEIGHT: u32 = 720;
/// Normalized frame rate
pub const TARGET_FPS: u32 = 24;
/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "veryfast";
/// Default CRF (Constant Rate Factor)
pub const DEFAULT_CRF: u8 = 20;
/// Pixel format accepted by every player we target
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";

/// Resolution requested from the generation service.
pub const GENERATION_RESOLUTION: &str = "720p";
/// Shortest clip the generation service is asked for.
pub const MIN_GENERATION_SECS: u32 = 5;
/// Longest clip the generation service is asked for.
pub const MAX_GENERATION_SECS: u32 = 10;

/// Clamp a requested duration to the generation bounds.
///
/// Non-finite values fall back to the minimum.
pub fn clamp_generation_duration(requested_secs: f64) -> u32 {
    if !requested_secs.is_finite() {
        return MIN_GENERATION_SECS;
    }
    requested_secs
        .round()
        .clamp(MIN_GENERATION_SECS as f64, MAX_GENERATION_SECS as f64) as u32
}

/// Encoding every clip is normalized to before concatenation.
///
/// Stream-copy concatenation only works when all inputs share codec,
/// resolution, frame rate and pixel format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizeProfile {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub codec: String,
    pub preset: String,
    pub crf: u8,
    pub pixel_format: String,
}

impl Default for NormalizeProfile {
    fn default() -> Self {
        Self {
            width: TARGET_WIDTH,
            height: TARGET_HEIGHT,
            fps: TARGET_FPS,
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            crf: DEFAULT_CRF,
            pixel_format: DEFAULT_PIXEL_FORMAT.to_string(),
        }
    }
}

impl NormalizeProfile {
    /// Scale into the target box preserving aspect ratio, letterbox the rest.
    pub fn video_filter(&self) -> String {
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,format={pix}",
            w = self.width,
            h = self.height,
            pix = self.pixel_format
        )
    }
}
