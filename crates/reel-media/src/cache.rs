//! Caching a single remote clip locally with fast-start metadata.

use tracing::{info, warn};

use crate::command::faststart_command;
use crate::error::MediaResult;
use crate::fetch::download_to_file;
use crate::pipeline::ClipPipeline;
use crate::reference::StorageRoot;

impl ClipPipeline {
    /// Download `url` and store it as `<root>/<filename>`, remuxed for
    /// progressive playback.
    ///
    /// If the remux fails the downloaded bytes are stored unchanged: a
    /// playable file without fast-start beats no file. The temporary
    /// download is always removed.
    ///
    /// Returns the public path (`/uploads/<filename>`).
    pub async fn cache_remote_clip(&self, url: &str, filename: &str) -> MediaResult<String> {
        let final_path = self.storage.output_path(filename)?;
        self.storage.ensure_exists().await?;

        let temp = tempfile::Builder::new()
            .prefix("clip-download-")
            .suffix(".mp4")
            .tempfile_in(self.storage.path())?
            .into_temp_path();

        download_to_file(&self.http, url, &temp).await?;

        let args = faststart_command(&temp, &final_path).build_args();
        let remux = self.runner.run(&args, None).await;

        let fallback_reason = match remux {
            Ok(out) if out.success() => None,
            Ok(out) => Some(format!(
                "exit code {:?}: {}",
                out.exit_code,
                out.stderr_text().unwrap_or_default()
            )),
            Err(e) => Some(e.to_string()),
        };

        if let Some(reason) = fallback_reason {
            warn!(
                url,
                output = %final_path.display(),
                reason = %reason,
                "Fast-start remux failed, storing downloaded clip as-is"
            );
            metrics::counter!("reel_faststart_fallback_total").increment(1);
            tokio::fs::copy(&temp, &final_path).await?;
        }

        if let Err(e) = temp.close() {
            warn!(error = %e, "Failed to remove temporary download");
        }

        info!(url, output = %final_path.display(), "Cached remote clip");
        Ok(StorageRoot::public_path(filename))
    }
}
