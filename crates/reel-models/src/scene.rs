//! Scene, style bible and prompt bundle definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One scene of a storyline, as handed over by the storyline service.
///
/// Every text field defaults to empty so partially written scenes still
/// deserialize; prompt composition renders empty fields as empty values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    /// Slugline / scene heading (e.g. "INT. LIGHTHOUSE - NIGHT")
    pub slugline: String,
    pub shot_design: String,
    pub visual_direction: String,
    pub camera_language: String,
    pub audio_mood: String,
    pub voiceover: String,
    pub on_screen_text: String,
    pub reference_synopsis: String,
    /// Requested clip length in seconds
    pub duration_seconds: f64,
    /// Storyboard frame of this scene
    pub image_url: String,
}

/// Project-wide look and camera rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleBible {
    pub visual_style: String,
    pub camera_grammar: String,
    pub palette_texture: String,
    pub cinematic_language: String,
    pub dos: Vec<String>,
    pub donts: Vec<String>,
}

/// Canon shared by every scene: overview, characters, locations and the
/// invariants that must never break between shots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ScenesBible {
    pub overview: String,
    pub character_canon: String,
    pub location_canon: String,
    pub continuity_invariants: Vec<String>,
}

/// The three prompt layers built for one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenePromptBundle {
    pub director_prompt: String,
    pub cinematographer_prompt: String,
    /// Hard constraints first, camera second, performance last
    pub merged_prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_deserializes_with_missing_fields() {
        let scene: Scene =
            serde_json::from_str(r#"{"slugline":"EXT. PIER - DAWN","durationSeconds":6}"#)
                .unwrap();
        assert_eq!(scene.slugline, "EXT. PIER - DAWN");
        assert_eq!(scene.duration_seconds, 6.0);
        assert!(scene.visual_direction.is_empty());
    }

    #[test]
    fn test_bible_invariants_default_empty() {
        let bible: ScenesBible = serde_json::from_str("{}").unwrap();
        assert!(bible.continuity_invariants.is_empty());
    }
}
