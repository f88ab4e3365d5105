//! Shot generation and film assembly worker.
//!
//! This crate provides:
//! - The generation orchestrator (reference resolution, upload, submission)
//! - The shot pipeline chaining anchor, prompts, evaluation, generation and caching
//! - Job files for the `reel-worker` binary
//! - Structured job logging

pub mod config;
pub mod error;
pub mod generation;
pub mod job;
pub mod logging;
pub mod pipeline;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use generation::{content_type_for, ShotGenerator};
pub use job::{FilmRequest, JobFile, JobOutput, JobRunner};
pub use logging::JobLogger;
pub use pipeline::{ShotOutcome, ShotPipeline, ShotRequest};
