//! Anchor image selection.
//!
//! Precedence, first match wins:
//! 1. mode `off` -> current scene frame
//! 2. manual anchor (id and image)
//! 3. previous clip last frame (previous scene id and frame)
//! 4. strict mode only: previous scene storyboard frame
//! 5. current scene frame

use serde::{Deserialize, Serialize};
use tracing::debug;

use reel_models::{AnchorDecision, AnchorSource, ContinuationMode};

/// Material from earlier shots that may serve as an anchor.
///
/// Values are trimmed before use; blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnchorContext {
    pub previous_scene_id: Option<String>,
    pub previous_scene_image: Option<String>,
    pub previous_clip_last_frame: Option<String>,
    pub manual_anchor_beat_id: Option<String>,
    pub manual_anchor_image: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Pick the source image for the next shot.
///
/// Never fails. An empty `current_scene_image` is passed through as-is and
/// must be rejected by the caller before anything is submitted remotely.
pub fn resolve_anchor(
    mode: ContinuationMode,
    current_scene_image: &str,
    ctx: &AnchorContext,
) -> AnchorDecision {
    let current = current_scene_image.trim();

    let decision = if mode == ContinuationMode::Off {
        own_frame(current, AnchorSource::ContinuationOffCurrentSceneFrame)
    } else if let (Some(beat_id), Some(image)) = (
        present(&ctx.manual_anchor_beat_id),
        present(&ctx.manual_anchor_image),
    ) {
        anchored(beat_id, image, AnchorSource::ManualAnchorScene)
    } else if let (Some(scene_id), Some(frame)) = (
        present(&ctx.previous_scene_id),
        present(&ctx.previous_clip_last_frame),
    ) {
        anchored(scene_id, frame, AnchorSource::PreviousClipLastFrame)
    } else if let (ContinuationMode::Strict, Some(scene_id), Some(image)) = (
        mode,
        present(&ctx.previous_scene_id),
        present(&ctx.previous_scene_image),
    ) {
        anchored(scene_id, image, AnchorSource::PreviousSceneStoryboardFrame)
    } else {
        own_frame(current, AnchorSource::CurrentSceneFrame)
    };

    debug!(
        mode = %mode,
        anchor_source = %decision.anchor_source,
        anchor_beat_id = %decision.anchor_beat_id,
        "Resolved shot anchor"
    );

    decision
}

fn own_frame(image: &str, source: AnchorSource) -> AnchorDecision {
    AnchorDecision {
        anchor_beat_id: String::new(),
        source_image_url: image.to_string(),
        anchor_source: source,
    }
}

fn anchored(beat_id: &str, image: &str, source: AnchorSource) -> AnchorDecision {
    AnchorDecision {
        anchor_beat_id: beat_id.to_string(),
        source_image_url: image.to_string(),
        anchor_source: source,
    }
}
