//! Job files run by the `reel-worker` binary.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use reel_gen_client::GenClient;
use reel_media::{ClipPipeline, FfmpegRunner, StorageRoot};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::generation::ShotGenerator;
use crate::logging::JobLogger;
use crate::pipeline::{ShotOutcome, ShotPipeline, ShotRequest};

/// Final film assembly request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmRequest {
    /// Clip references in playback order
    pub clips: Vec<String>,
    pub output_filename: String,
}

/// A job file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobFile {
    GenerateShot(ShotRequest),
    AssembleFilm(FilmRequest),
}

impl JobFile {
    pub async fn load(path: impl AsRef<Path>) -> WorkerResult<Self> {
        let raw = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    pub fn operation(&self) -> &'static str {
        match self {
            JobFile::GenerateShot(_) => "generate_shot",
            JobFile::AssembleFilm(_) => "assemble_film",
        }
    }
}

/// What a job produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobOutput {
    Shot(ShotOutcome),
    Film {
        #[serde(rename = "filmPath")]
        film_path: String,
    },
}

/// Executes job files.
#[derive(Clone)]
pub struct JobRunner {
    shots: ShotPipeline,
}

impl JobRunner {
    pub fn new(shots: ShotPipeline) -> Self {
        Self { shots }
    }

    /// Wire up the real generation client and FFmpeg.
    pub fn from_config(config: &WorkerConfig) -> WorkerResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WorkerError::config_error(format!("HTTP client: {}", e)))?;

        let storage = StorageRoot::new(&config.storage_root);
        let service = Arc::new(GenClient::from_env()?);
        let clips = ClipPipeline::new(
            http,
            Arc::new(FfmpegRunner::with_binary(&config.ffmpeg_bin)),
            storage.clone(),
        );

        Ok(Self::new(ShotPipeline::new(
            ShotGenerator::new(service, storage),
            clips,
            config.continuity_threshold,
        )))
    }

    pub async fn run(&self, job: &JobFile, job_id: &str) -> WorkerResult<JobOutput> {
        let logger = JobLogger::new(job_id, job.operation());
        let span = logger.create_span();

        let result = async {
            match job {
                JobFile::GenerateShot(request) => {
                    logger.log_start(&format!(
                        "scene '{}' ({} mode)",
                        request.scene.id, request.mode
                    ));
                    self.shots
                        .run_shot(request, &logger)
                        .await
                        .map(JobOutput::Shot)
                }
                JobFile::AssembleFilm(request) => {
                    logger.log_start(&format!(
                        "{} clips into {}",
                        request.clips.len(),
                        request.output_filename
                    ));
                    self.shots
                        .clips()
                        .assemble_film(&request.clips, &request.output_filename)
                        .await
                        .map(|film_path| {
                            logger.log_completion(&film_path);
                            JobOutput::Film { film_path }
                        })
                        .map_err(WorkerError::from)
                }
            }
        }
        .instrument(span)
        .await;

        if let Err(e) = &result {
            logger.log_error(&e.to_string());
        }
        result
    }
}
