//! Prompt composition.
//!
//! Three layers are built per generation attempt. The merged prompt puts
//! the scenes bible (hard constraints) first, the cinematographer layer
//! second and the director layer last; generation weighs earlier text
//! more heavily, so this order must not change.
//!
//! Missing values render as empty strings. Lines are never dropped, so the
//! prompt shape is identical for every scene.

use reel_models::{Scene, ScenePromptBundle, ScenesBible, StyleBible};

/// Maximum length of the location canon excerpt in the cinematographer layer.
pub const LOCATION_EXCERPT_CHARS: usize = 600;

const DIRECTOR_OBJECTIVE: &str =
    "Objective: keep the shot coherent, cinematic and legible from first to last frame.";
const DIRECTOR_EXCLUSIONS: &str = "Avoid: visual artifacts, stray text overlays, watermarks.";
const TECHNICAL_CONSTRAINTS: &str = "Technical constraints: keep the screen axis consistent, \
     no jumpy lens changes, preserve subject scale continuity.";

/// Everything the composer reads for one scene.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub project_title: &'a str,
    pub scene: &'a Scene,
    pub style: &'a StyleBible,
    pub scenes_bible: Option<&'a ScenesBible>,
    pub director_override: Option<&'a str>,
}

/// Build all three prompt layers.
pub fn compose_prompts(inputs: &PromptInputs<'_>) -> ScenePromptBundle {
    let director_prompt = build_director_prompt(inputs);
    let cinematographer_prompt = build_cinematographer_prompt(inputs);
    let merged_prompt = build_merged_prompt(
        inputs.scenes_bible,
        &cinematographer_prompt,
        &director_prompt,
    );

    ScenePromptBundle {
        director_prompt,
        cinematographer_prompt,
        merged_prompt,
    }
}

/// Performance and story intent for the shot.
pub fn build_director_prompt(inputs: &PromptInputs<'_>) -> String {
    let scene = inputs.scene;
    let style = inputs.style;

    [
        format!("Project: {}", inputs.project_title.trim()),
        format!("Scene: {}", scene.slugline.trim()),
        format!("Visual direction: {}", scene.visual_direction.trim()),
        format!("Camera language: {}", scene.camera_language.trim()),
        format!("Audio mood: {}", scene.audio_mood.trim()),
        format!("Voiceover intent: {}", scene.voiceover.trim()),
        format!("On-screen text: {}", scene.on_screen_text.trim()),
        format!("Duration: {}", format_duration(scene.duration_seconds)),
        format!("Reference synopsis: {}", scene.reference_synopsis.trim()),
        format!("Style visual: {}", style.visual_style.trim()),
        format!("Style camera grammar: {}", style.camera_grammar.trim()),
        format!("Do: {}", join_items(&style.dos, "; ")),
        format!("Don't: {}", join_items(&style.donts, "; ")),
        format!(
            "Director override: {}",
            inputs.director_override.unwrap_or_default().trim()
        ),
        DIRECTOR_OBJECTIVE.to_string(),
        DIRECTOR_EXCLUSIONS.to_string(),
    ]
    .join("\n")
}

/// Camera and look constraints for the shot.
pub fn build_cinematographer_prompt(inputs: &PromptInputs<'_>) -> String {
    let scene = inputs.scene;
    let style = inputs.style;
    let location = inputs
        .scenes_bible
        .map(|b| truncate_chars(b.location_canon.trim(), LOCATION_EXCERPT_CHARS))
        .unwrap_or_default();
    let invariants = inputs
        .scenes_bible
        .map(|b| join_items(&b.continuity_invariants, "; "))
        .unwrap_or_default();

    [
        format!("Scene heading: {}", scene.slugline.trim()),
        format!("Shot design: {}", scene.shot_design.trim()),
        format!("Visual direction: {}", scene.visual_direction.trim()),
        format!("Location canon: {}", location),
        format!("Camera grammar lock: {}", style.camera_grammar.trim()),
        format!("Palette and texture lock: {}", style.palette_texture.trim()),
        format!("Cinematic language lock: {}", style.cinematic_language.trim()),
        format!("Continuity invariants: {}", invariants),
        TECHNICAL_CONSTRAINTS.to_string(),
    ]
    .join("\n")
}

/// Hard constraints, then camera, then performance.
pub fn build_merged_prompt(
    scenes_bible: Option<&ScenesBible>,
    cinematographer_prompt: &str,
    director_prompt: &str,
) -> String {
    let empty = ScenesBible::default();
    let bible = scenes_bible.unwrap_or(&empty);

    let mut lines = vec![
        format!("Scenes bible overview: {}", bible.overview.trim()),
        format!("Character canon: {}", bible.character_canon.trim()),
        format!("Location canon: {}", bible.location_canon.trim()),
        "Continuity invariants:".to_string(),
    ];
    lines.extend(
        bible
            .continuity_invariants
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| format!("- {}", s)),
    );
    lines.push("Cinematographer constraints:".to_string());
    lines.push(cinematographer_prompt.to_string());
    lines.push("Director intent:".to_string());
    lines.push(director_prompt.to_string());

    lines.join("\n")
}

fn format_duration(secs: f64) -> String {
    if secs.is_finite() && secs > 0.0 {
        format!("{}s", secs)
    } else {
        String::new()
    }
}

fn join_items(items: &[String], sep: &str) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
