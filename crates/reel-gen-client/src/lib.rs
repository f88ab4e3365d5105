//! Client for the remote image-to-video generation service.
//!
//! The service is queue based: a job is submitted, its status is polled
//! (with log lines) until it reaches a terminal state, then the result
//! payload is fetched and the video URL extracted from it. Local images
//! are uploaded to the service's asset store first.

pub mod client;
pub mod error;
pub mod service;
pub mod types;

pub use client::{GenClient, GenClientConfig};
pub use error::{GenError, GenResult};
pub use service::{LogCallback, VideoGenerationService};
pub use types::{extract_video_url, GenerationRequest, VIDEO_URL_POINTERS};
