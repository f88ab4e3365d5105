//! Fetching clip bytes from remote URLs or the storage root.

use std::path::Path;

use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};
use crate::reference::{MediaReference, StorageRoot};

/// Stream a remote URL into `dest`. Non-success statuses are errors.
///
/// Returns the number of bytes written.
pub async fn download_to_file(http: &Client, url: &str, dest: &Path) -> MediaResult<u64> {
    debug!(url, dest = %dest.display(), "Downloading media");

    let mut response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(MediaError::download_failed(format!(
            "GET {} returned {}",
            url, status
        )));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    info!(url, bytes = written, "Downloaded media");
    Ok(written)
}

/// Place the bytes of a clip reference at `dest`.
///
/// Local references are copied from the storage root, remote ones are
/// downloaded. Any other reference form is rejected.
pub async fn materialize_clip(
    http: &Client,
    storage: &StorageRoot,
    reference: &str,
    dest: &Path,
) -> MediaResult<()> {
    match MediaReference::parse(reference)? {
        MediaReference::Local(filename) => {
            let source = storage.existing_file(&filename).await?;
            tokio::fs::copy(&source, dest).await?;
        }
        MediaReference::Remote(url) => {
            download_to_file(http, &url, dest).await?;
        }
    }
    Ok(())
}
