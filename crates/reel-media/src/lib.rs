//! FFmpeg CLI wrapper for clip normalization and film assembly.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building for the remux, normalize and concat passes
//! - A [`ProcessRunner`] seam so pipelines can run without a real FFmpeg
//! - Media reference resolution against the local storage root
//! - Single remote clip caching with fast-start fallback
//! - Final film assembly inside a self-cleaning temporary workspace

pub mod assembly;
pub mod cache;
pub mod command;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod reference;
pub mod workspace;

pub use assembly::{build_concat_manifest, quote_concat_path};
pub use command::{
    check_ffmpeg, concat_command, faststart_command, normalize_command, FfmpegCommand,
    FfmpegRunner, ProcessOutput, ProcessRunner,
};
pub use error::{MediaError, MediaResult};
pub use fetch::{download_to_file, materialize_clip};
pub use pipeline::ClipPipeline;
pub use reference::{is_remote_url, MediaReference, StorageRoot, LOCAL_MEDIA_PREFIX};
pub use workspace::{FilmWorkspace, WORKSPACE_PREFIX};
