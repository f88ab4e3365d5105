//! Final film assembly from N clips.
//!
//! Every clip is fetched into a private [`FilmWorkspace`], re-encoded to the
//! shared [`NormalizeProfile`](reel_models::NormalizeProfile), listed in a
//! concat manifest and stream-copied into the final file. The workspace is
//! removed on every exit path.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::command::{concat_command, normalize_command};
use crate::error::{MediaError, MediaResult};
use crate::fetch::materialize_clip;
use crate::pipeline::ClipPipeline;
use crate::reference::StorageRoot;
use crate::workspace::FilmWorkspace;

impl ClipPipeline {
    /// Build `<root>/<output_filename>` from the given clip references, in order.
    ///
    /// Returns the public path (`/uploads/<output_filename>`).
    pub async fn assemble_film(
        &self,
        clips: &[String],
        output_filename: &str,
    ) -> MediaResult<String> {
        if clips.is_empty() {
            return Err(MediaError::EmptyInput("final film assembly".to_string()));
        }
        let output_path = self.storage.output_path(output_filename)?;
        self.storage.ensure_exists().await?;

        let started = Instant::now();
        let workspace = FilmWorkspace::create_in(self.storage.path())?;
        info!(
            clips = clips.len(),
            output = %output_path.display(),
            workspace = %workspace.path().display(),
            "Assembling film"
        );

        let mut normalized = Vec::with_capacity(clips.len());
        for (index, reference) in clips.iter().enumerate() {
            normalized.push(self.normalize_clip(&workspace, index, reference).await?);
        }

        let manifest = workspace.manifest_path();
        tokio::fs::write(&manifest, build_concat_manifest(&normalized))
            .await?;

        let args = concat_command(&manifest, &output_path).build_args();
        let out = self.runner.run(&args, None).await?;
        if !out.success() {
            // Do not leave a truncated film behind.
            if let Err(e) = tokio::fs::remove_file(&output_path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(error = %e, "Failed to remove partial film output");
                }
            }
            let stderr = out.stderr_text();
            return Err(MediaError::ffmpeg_failed(
                format!(
                    "Concatenation failed: {}",
                    stderr.as_deref().unwrap_or("no error output")
                ),
                stderr,
                out.exit_code,
            ));
        }

        if let Err(e) = workspace.close() {
            warn!(error = %e, "Failed to remove film workspace");
        }

        let elapsed = started.elapsed().as_secs_f64();
        metrics::counter!("reel_films_assembled_total").increment(1);
        metrics::histogram!("reel_film_assembly_seconds").record(elapsed);
        info!(
            output = %output_path.display(),
            elapsed_secs = elapsed,
            "Film assembled"
        );

        Ok(StorageRoot::public_path(output_filename))
    }

    /// Fetch clip `index` into the workspace and re-encode it.
    async fn normalize_clip(
        &self,
        workspace: &FilmWorkspace,
        index: usize,
        reference: &str,
    ) -> MediaResult<PathBuf> {
        let source = workspace.source_path(index);
        let normalized = workspace.normalized_path(index);

        materialize_clip(&self.http, &self.storage, reference, &source)
            .await?;

        let args = normalize_command(&source, &normalized, &self.profile).build_args();
        let out = self.runner.run(&args, None).await?;
        if !out.success() {
            metrics::counter!("reel_clip_normalize_failures_total").increment(1);
            let stderr = out.stderr_text();
            return Err(MediaError::clip_failed(
                index,
                format!(
                    "Normalization failed for clip {}: {}",
                    index,
                    stderr.as_deref().unwrap_or("no error output")
                ),
                stderr,
                out.exit_code,
            ));
        }

        info!(clip_index = index, reference, "Normalized clip");
        Ok(normalized)
    }
}

/// Concat demuxer manifest: one single-quoted `file` line per clip.
pub fn build_concat_manifest(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("file {}\n", quote_concat_path(p)))
        .collect()
}

/// Single-quote a path for the concat demuxer, escaping embedded quotes.
pub fn quote_concat_path(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain_path() {
        assert_eq!(
            quote_concat_path(Path::new("/srv/uploads/a.mp4")),
            "'/srv/uploads/a.mp4'"
        );
    }

    #[test]
    fn test_quote_escapes_single_quotes() {
        assert_eq!(
            quote_concat_path(Path::new("/srv/it's/a.mp4")),
            r"'/srv/it'\''s/a.mp4'"
        );
    }

    #[test]
    fn test_manifest_lists_clips_in_order() {
        let manifest = build_concat_manifest(&[
            PathBuf::from("/w/normalized-000.mp4"),
            PathBuf::from("/w/normalized-001.mp4"),
        ]);
        assert_eq!(
            manifest,
            "file '/w/normalized-000.mp4'\nfile '/w/normalized-001.mp4'\n"
        );
    }
}
