//! Single-shot pipeline.
//!
//! anchor -> prompts -> continuity evaluation -> generation -> local cache

use serde::{Deserialize, Serialize};

use reel_continuity::{
    compose_prompts, evaluate_continuity, resolve_anchor, AnchorContext, ContinuityInputs,
    PromptInputs,
};
use reel_media::ClipPipeline;
use reel_models::{
    AnchorDecision, ContinuationMode, ContinuityEvaluation, Scene, ScenePromptBundle, ScenesBible,
    StyleBible,
};

use crate::error::{WorkerError, WorkerResult};
use crate::generation::ShotGenerator;
use crate::logging::JobLogger;

/// Everything needed to generate one shot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShotRequest {
    pub project_title: String,
    pub scene: Scene,
    pub style: StyleBible,
    pub scenes_bible: Option<ScenesBible>,
    pub mode: ContinuationMode,
    pub anchor: AnchorContext,
    pub director_override: Option<String>,
    /// Overrides the configured continuity threshold
    pub threshold: Option<f64>,
    /// Name of the cached clip under the storage root; generated when absent
    pub output_filename: Option<String>,
}

/// Result of one shot, with every intermediate decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotOutcome {
    pub anchor: AnchorDecision,
    pub prompts: ScenePromptBundle,
    pub evaluation: ContinuityEvaluation,
    pub remote_video_url: String,
    /// `/uploads/<filename>`
    pub clip_path: String,
}

/// Runs shots end to end.
#[derive(Clone)]
pub struct ShotPipeline {
    generator: ShotGenerator,
    clips: ClipPipeline,
    default_threshold: f64,
}

impl ShotPipeline {
    pub fn new(generator: ShotGenerator, clips: ClipPipeline, default_threshold: f64) -> Self {
        Self {
            generator,
            clips,
            default_threshold,
        }
    }

    pub fn clips(&self) -> &ClipPipeline {
        &self.clips
    }

    /// Generate one shot and cache the resulting clip locally.
    ///
    /// The continuity evaluation is advisory: a regenerate recommendation is
    /// logged and returned, the shot is still generated.
    pub async fn run_shot(
        &self,
        request: &ShotRequest,
        logger: &JobLogger,
    ) -> WorkerResult<ShotOutcome> {
        let anchor = resolve_anchor(request.mode, &request.scene.image_url, &request.anchor);
        logger.log_anchor(&anchor);

        let prompts = compose_prompts(&PromptInputs {
            project_title: &request.project_title,
            scene: &request.scene,
            style: &request.style,
            scenes_bible: request.scenes_bible.as_ref(),
            director_override: request.director_override.as_deref(),
        });

        let evaluation = evaluate_continuity(&ContinuityInputs {
            mode: request.mode,
            has_anchor: anchor.has_anchor(),
            director_prompt: &prompts.director_prompt,
            cinematographer_prompt: &prompts.cinematographer_prompt,
            threshold: Some(request.threshold.unwrap_or(self.default_threshold)),
        });
        logger.log_evaluation(&evaluation);

        if anchor.source_image_url.is_empty() {
            return Err(WorkerError::invalid_input(format!(
                "scene '{}' has no source image",
                request.scene.id
            )));
        }

        let remote_video_url = self
            .generator
            .generate_clip(
                &anchor.source_image_url,
                &prompts.merged_prompt,
                request.scene.duration_seconds,
                logger,
            )
            .await?;

        let filename = request
            .output_filename
            .clone()
            .unwrap_or_else(|| format!("shot-{}.mp4", uuid::Uuid::new_v4()));
        let clip_path = self
            .clips
            .cache_remote_clip(&remote_video_url, &filename)
            .await?;

        logger.log_completion(&clip_path);
        Ok(ShotOutcome {
            anchor,
            prompts,
            evaluation,
            remote_video_url,
            clip_path,
        })
    }
}
