//! Structured job logging.
//!
//! Every line carries `job_id` and `operation`. Shot jobs additionally
//! report the anchor decision and the continuity evaluation as fields, so
//! a film's continuity can be followed shot by shot in JSON logs.

use tracing::{error, info, warn, Span};

use reel_models::{AnchorDecision, ContinuityEvaluation};

/// Logger bound to one job.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    operation: String,
}

impl JobLogger {
    /// `operation` is the job kind, `generate_shot` or `assemble_film`.
    pub fn new(job_id: &str, operation: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job progress: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job completed: {}", message
        );
    }

    /// Which image the shot will be generated from.
    pub fn log_anchor(&self, decision: &AnchorDecision) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            anchor_source = %decision.anchor_source,
            anchor_beat_id = %decision.anchor_beat_id,
            source_image = %decision.source_image_url,
            "Anchor resolved"
        );
    }

    /// Continuity score of the shot. A regenerate recommendation is a warning.
    pub fn log_evaluation(&self, evaluation: &ContinuityEvaluation) {
        if evaluation.recommend_regenerate {
            warn!(
                job_id = %self.job_id,
                operation = %self.operation,
                score = evaluation.score,
                "Regeneration recommended: {}", evaluation.reason
            );
        } else {
            info!(
                job_id = %self.job_id,
                operation = %self.operation,
                score = evaluation.score,
                "{}", evaluation.reason
            );
        }
    }

    /// A line reported by the remote generation service.
    pub fn log_remote(&self, line: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Generation log: {}", line
        );
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Span wrapping a whole job run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "job",
            job_id = %self.job_id,
            operation = %self.operation
        )
    }
}
