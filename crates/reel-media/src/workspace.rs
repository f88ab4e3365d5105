//! Scoped temporary workspace for one film build.
//!
//! The directory is created under the storage root and removed recursively
//! when the [`FilmWorkspace`] is dropped, which covers early returns and
//! propagated errors alike. [`FilmWorkspace::close`] removes it explicitly
//! and reports failures on the success path.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::TempDir;
use tracing::debug;

use crate::error::MediaResult;

/// Name prefix of every build workspace directory.
pub const WORKSPACE_PREFIX: &str = "film-build-";

/// Name of the concat manifest inside a workspace.
const MANIFEST_NAME: &str = "concat.txt";

/// Temporary directory owning all intermediate files of one build.
#[derive(Debug)]
pub struct FilmWorkspace {
    dir: TempDir,
}

impl FilmWorkspace {
    /// Create a uniquely named workspace (timestamp + random suffix) in `root`.
    pub fn create_in(root: &Path) -> MediaResult<Self> {
        let prefix = format!(
            "{}{}-",
            WORKSPACE_PREFIX,
            Utc::now().format("%Y%m%d%H%M%S%3f")
        );
        let dir = tempfile::Builder::new()
            .prefix(&prefix)
            .rand_bytes(8)
            .tempdir_in(root)?;

        debug!(path = %dir.path().display(), "Created film workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where clip `index` is fetched to.
    pub fn source_path(&self, index: usize) -> PathBuf {
        self.dir.path().join(format!("source-{:03}.mp4", index))
    }

    /// Where the normalized version of clip `index` is written.
    pub fn normalized_path(&self, index: usize) -> PathBuf {
        self.dir.path().join(format!("normalized-{:03}.mp4", index))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.path().join(MANIFEST_NAME)
    }

    /// Remove the workspace now, surfacing removal errors.
    pub fn close(self) -> MediaResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!(path = %path.display(), "Removed film workspace");
        Ok(())
    }
}
