//! Continuation modes, anchor provenance and continuity evaluations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How strongly a new shot is tied to the material that came before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContinuationMode {
    /// No continuity; every shot starts from its own storyboard frame
    Off,
    /// Previous scene frames are used even without a rendered clip
    Strict,
    /// Anchors come from rendered clips only
    #[default]
    Balanced,
    /// Same anchor rules as balanced, with a more forgiving baseline score
    Loose,
}

impl ContinuationMode {
    pub const ALL: &'static [ContinuationMode] = &[
        ContinuationMode::Off,
        ContinuationMode::Strict,
        ContinuationMode::Balanced,
        ContinuationMode::Loose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContinuationMode::Off => "off",
            ContinuationMode::Strict => "strict",
            ContinuationMode::Balanced => "balanced",
            ContinuationMode::Loose => "loose",
        }
    }
}

impl fmt::Display for ContinuationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContinuationMode {
    type Err = ContinuationModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(ContinuationMode::Off),
            "strict" => Ok(ContinuationMode::Strict),
            "balanced" => Ok(ContinuationMode::Balanced),
            "loose" => Ok(ContinuationMode::Loose),
            _ => Err(ContinuationModeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown continuation mode: {0}")]
pub struct ContinuationModeParseError(String);

/// Where the source image of a generated shot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum AnchorSource {
    #[serde(rename = "continuation-off-current-scene-frame")]
    ContinuationOffCurrentSceneFrame,
    #[serde(rename = "manual-anchor-scene")]
    ManualAnchorScene,
    #[serde(rename = "previous-clip-last-frame")]
    PreviousClipLastFrame,
    #[serde(rename = "previous-scene-storyboard-frame")]
    PreviousSceneStoryboardFrame,
    #[serde(rename = "current-scene-frame")]
    CurrentSceneFrame,
}

impl AnchorSource {
    /// Provenance tag as sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorSource::ContinuationOffCurrentSceneFrame => {
                "continuation-off-current-scene-frame"
            }
            AnchorSource::ManualAnchorScene => "manual-anchor-scene",
            AnchorSource::PreviousClipLastFrame => "previous-clip-last-frame",
            AnchorSource::PreviousSceneStoryboardFrame => "previous-scene-storyboard-frame",
            AnchorSource::CurrentSceneFrame => "current-scene-frame",
        }
    }

    /// Whether the image comes from material other than the current scene.
    pub fn is_carried_over(&self) -> bool {
        matches!(
            self,
            AnchorSource::ManualAnchorScene
                | AnchorSource::PreviousClipLastFrame
                | AnchorSource::PreviousSceneStoryboardFrame
        )
    }
}

impl fmt::Display for AnchorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The image a new shot is generated from, and why it was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnchorDecision {
    /// Beat/scene id the anchor was taken from; empty when the current scene is used
    pub anchor_beat_id: String,
    /// Image reference (remote URL or `/uploads/...` path)
    pub source_image_url: String,
    pub anchor_source: AnchorSource,
}

impl AnchorDecision {
    /// Whether a carried-over anchor was actually obtained.
    pub fn has_anchor(&self) -> bool {
        self.anchor_source.is_carried_over() && !self.source_image_url.is_empty()
    }
}

/// Heuristic estimate of how well a shot will hold continuity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContinuityEvaluation {
    /// Score in [0, 1]
    pub score: f64,
    pub recommend_regenerate: bool,
    pub reason: String,
}
