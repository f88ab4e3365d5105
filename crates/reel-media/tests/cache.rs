//! Single clip caching with fast-start fallback.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reel_media::{
    ClipPipeline, MediaError, MediaResult, ProcessOutput, ProcessRunner, StorageRoot,
};

const CLIP_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42 original clip bytes";

/// Remux stand-in: either writes a marker to the output or exits non-zero
/// after leaving a partial file behind.
struct FakeRemux {
    succeed: bool,
}

#[async_trait]
impl ProcessRunner for FakeRemux {
    async fn run(&self, args: &[String], _stdin: Option<&[u8]>) -> MediaResult<ProcessOutput> {
        let output = args.last().unwrap();
        if self.succeed {
            std::fs::write(output, b"remuxed").unwrap();
            Ok(ProcessOutput {
                exit_code: Some(0),
                stderr: String::new(),
            })
        } else {
            std::fs::write(output, b"partial").unwrap();
            Ok(ProcessOutput {
                exit_code: Some(1),
                stderr: "moov atom not found".to_string(),
            })
        }
    }
}

/// Transcoder that cannot even be started.
struct MissingFfmpeg;

#[async_trait]
impl ProcessRunner for MissingFfmpeg {
    async fn run(&self, _args: &[String], _stdin: Option<&[u8]>) -> MediaResult<ProcessOutput> {
        Err(MediaError::FfmpegNotFound("ffmpeg".to_string()))
    }
}

async fn clip_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/result/video.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(CLIP_BYTES.to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/result/expired.mp4"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    server
}

fn root_entries(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_remux_success_writes_remuxed_file() {
    let server = clip_server().await;
    let dir = TempDir::new().unwrap();
    let pipeline = ClipPipeline::new(
        Client::new(),
        Arc::new(FakeRemux { succeed: true }),
        StorageRoot::new(dir.path()),
    );

    let public = pipeline
        .cache_remote_clip(&format!("{}/result/video.mp4", server.uri()), "shot-1.mp4")
        .await
        .unwrap();

    assert_eq!(public, "/uploads/shot-1.mp4");
    assert_eq!(std::fs::read(dir.path().join("shot-1.mp4")).unwrap(), b"remuxed");
    assert_eq!(root_entries(dir.path()), vec!["shot-1.mp4"]);
}

#[tokio::test]
async fn test_remux_failure_falls_back_to_original_bytes() {
    let server = clip_server().await;
    let dir = TempDir::new().unwrap();
    let pipeline = ClipPipeline::new(
        Client::new(),
        Arc::new(FakeRemux { succeed: false }),
        StorageRoot::new(dir.path()),
    );

    let public = pipeline
        .cache_remote_clip(&format!("{}/result/video.mp4", server.uri()), "shot-2.mp4")
        .await
        .unwrap();

    assert_eq!(public, "/uploads/shot-2.mp4");
    assert_eq!(std::fs::read(dir.path().join("shot-2.mp4")).unwrap(), CLIP_BYTES);
    assert_eq!(root_entries(dir.path()), vec!["shot-2.mp4"]);
}

#[tokio::test]
async fn test_unrunnable_transcoder_also_falls_back() {
    let server = clip_server().await;
    let dir = TempDir::new().unwrap();
    let pipeline = ClipPipeline::new(
        Client::new(),
        Arc::new(MissingFfmpeg),
        StorageRoot::new(dir.path()),
    );

    pipeline
        .cache_remote_clip(&format!("{}/result/video.mp4", server.uri()), "shot-3.mp4")
        .await
        .unwrap();

    assert_eq!(std::fs::read(dir.path().join("shot-3.mp4")).unwrap(), CLIP_BYTES);
}

#[tokio::test]
async fn test_download_error_leaves_nothing_behind() {
    let server = clip_server().await;
    let dir = TempDir::new().unwrap();
    let pipeline = ClipPipeline::new(
        Client::new(),
        Arc::new(FakeRemux { succeed: true }),
        StorageRoot::new(dir.path()),
    );

    let err = pipeline
        .cache_remote_clip(&format!("{}/result/expired.mp4", server.uri()), "shot-4.mp4")
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::DownloadFailed { .. }));
    assert!(root_entries(dir.path()).is_empty());
}
