//! Media references and the local storage root.
//!
//! A reference is either an absolute http(s) URL or a local upload path of
//! the form `/uploads/<filename>[?query]`. Local references resolve to
//! `<root>/<filename>`; only the basename is used, so a reference can never
//! point outside the storage root.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{MediaError, MediaResult};

/// Path prefix of references served from the storage root.
pub const LOCAL_MEDIA_PREFIX: &str = "/uploads/";

/// A classified media reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaReference {
    /// Absolute http(s) URL, passed through untouched
    Remote(String),
    /// Basename of a file under the storage root
    Local(String),
}

impl MediaReference {
    /// Classify a reference string.
    pub fn parse(reference: &str) -> MediaResult<Self> {
        let reference = reference.trim();

        if is_remote_url(reference) {
            return Ok(Self::Remote(reference.to_string()));
        }

        if reference.starts_with(LOCAL_MEDIA_PREFIX) {
            let filename = local_filename(reference)
                .ok_or_else(|| MediaError::unsupported_reference(reference))?;
            return Ok(Self::Local(filename.to_string()));
        }

        Err(MediaError::unsupported_reference(reference))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Whether the string is an absolute http(s) URL with a host.
pub fn is_remote_url(reference: &str) -> bool {
    Url::parse(reference)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

/// Basename of a local reference with any query string removed.
fn local_filename(reference: &str) -> Option<&str> {
    let without_query = reference.split(['?', '#']).next().unwrap_or_default();
    let name = without_query.rsplit('/').next().unwrap_or_default();
    is_plain_filename(name).then_some(name)
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// The directory local media lives in and final outputs are written to.
#[derive(Debug, Clone)]
pub struct StorageRoot {
    root: PathBuf,
}

impl StorageRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create from `REEL_STORAGE_ROOT`, defaulting to `./uploads`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("REEL_STORAGE_ROOT").unwrap_or_else(|_| "./uploads".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist yet.
    pub async fn ensure_exists(&self) -> MediaResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Path of a file under the root, existing or not.
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Resolve a local filename to an existing file.
    pub async fn existing_file(&self, filename: &str) -> MediaResult<PathBuf> {
        let path = self.file_path(filename);
        if tokio::fs::try_exists(&path).await? {
            Ok(path)
        } else {
            Err(MediaError::FileNotFound(path))
        }
    }

    /// Root-relative path handed back to callers.
    pub fn public_path(filename: &str) -> String {
        format!("{}{}", LOCAL_MEDIA_PREFIX, filename)
    }

    /// Validate a caller-supplied output filename and return its full path.
    pub fn output_path(&self, filename: &str) -> MediaResult<PathBuf> {
        if !is_plain_filename(filename) {
            return Err(MediaError::InvalidOutputName(filename.to_string()));
        }
        Ok(self.file_path(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_remote() {
        let r = MediaReference::parse("https://cdn.example.com/clips/a.mp4?sig=1").unwrap();
        assert_eq!(
            r,
            MediaReference::Remote("https://cdn.example.com/clips/a.mp4?sig=1".to_string())
        );
        assert!(r.is_remote());
    }

    #[test]
    fn test_parse_local_strips_query_and_dirs() {
        assert_eq!(
            MediaReference::parse("/uploads/shot-1.png?v=3").unwrap(),
            MediaReference::Local("shot-1.png".to_string())
        );
        assert_eq!(
            MediaReference::parse("/uploads/nested/dir/clip.mp4").unwrap(),
            MediaReference::Local("clip.mp4".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_other_forms() {
        for reference in [
            "ftp://example.com/a.mp4",
            "file:///etc/passwd",
            "relative/clip.mp4",
            "/tmp/clip.mp4",
            "/uploads/",
            "/uploads/..",
            "",
        ] {
            let err = MediaReference::parse(reference).unwrap_err();
            assert!(
                matches!(err, MediaError::UnsupportedReference(_)),
                "{reference}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn test_existing_file_lookup() {
        let dir = TempDir::new().unwrap();
        let storage = StorageRoot::new(dir.path());
        tokio::fs::write(dir.path().join("a.mp4"), b"x")
            .await
            .unwrap();

        assert_eq!(
            storage.existing_file("a.mp4").await.unwrap(),
            dir.path().join("a.mp4")
        );
        let err = storage.existing_file("missing.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(p) if p.ends_with("missing.mp4")));
    }

    #[test]
    fn test_output_path_validation() {
        let storage = StorageRoot::new("/srv/uploads");
        assert_eq!(
            storage.output_path("film.mp4").unwrap(),
            PathBuf::from("/srv/uploads/film.mp4")
        );
        assert!(storage.output_path("../film.mp4").is_err());
        assert!(storage.output_path("").is_err());
        assert_eq!(StorageRoot::public_path("film.mp4"), "/uploads/film.mp4");
    }
}
