//! Shared context of the clip caching and film assembly entry points.

use std::sync::Arc;

use reqwest::Client;

use reel_models::NormalizeProfile;

use crate::command::{FfmpegRunner, ProcessRunner};
use crate::reference::StorageRoot;

/// HTTP client, transcoder and storage root used by both entry points.
///
/// Holds no per-build state, so one instance can serve concurrent builds.
#[derive(Clone)]
pub struct ClipPipeline {
    pub(crate) http: Client,
    pub(crate) runner: Arc<dyn ProcessRunner>,
    pub(crate) storage: StorageRoot,
    pub(crate) profile: NormalizeProfile,
}

impl ClipPipeline {
    pub fn new(http: Client, runner: Arc<dyn ProcessRunner>, storage: StorageRoot) -> Self {
        Self {
            http,
            runner,
            storage,
            profile: NormalizeProfile::default(),
        }
    }

    /// Pipeline using the real FFmpeg binary (`FFMPEG_BIN`) and `REEL_STORAGE_ROOT`.
    pub fn from_env(http: Client) -> Self {
        Self::new(
            http,
            Arc::new(FfmpegRunner::from_env()),
            StorageRoot::from_env(),
        )
    }

    /// Override the normalization profile.
    pub fn with_profile(mut self, profile: NormalizeProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn storage(&self) -> &StorageRoot {
        &self.storage
    }

    pub fn profile(&self) -> &NormalizeProfile {
        &self.profile
    }
}
