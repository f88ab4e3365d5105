//! FFmpeg command builder and runner.
//!
//! Pipelines never spawn processes directly; they hand argument lists to a
//! [`ProcessRunner`]. [`FfmpegRunner`] is the real implementation, tests
//! substitute fakes with canned exit codes.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use reel_models::NormalizeProfile;

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Input arguments (before -i)
    input_args: Vec<String>,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add input arguments (before -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add multiple input arguments.
    pub fn input_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Read the input as a concat demuxer manifest.
    pub fn concat_manifest(self) -> Self {
        self.input_args(["-f", "concat", "-safe", "0"])
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Copy all streams without re-encoding.
    pub fn codec_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Drop audio streams.
    pub fn no_audio(self) -> Self {
        self.output_arg("-an")
    }

    /// Force output frame rate.
    pub fn frame_rate(self, fps: u32) -> Self {
        self.output_arg("-r").output_arg(fps.to_string())
    }

    /// Set CRF (quality).
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    /// Set output pixel format.
    pub fn pixel_format(self, format: impl Into<String>) -> Self {
        self.output_arg("-pix_fmt").output_arg(format)
    }

    /// Move the moov atom to the front for progressive playback.
    pub fn faststart(self) -> Self {
        self.output_arg("-movflags").output_arg("+faststart")
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        args.extend(self.input_args.clone());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Stream-copy remux with the index moved up front.
pub fn faststart_command(input: impl AsRef<Path>, output: impl AsRef<Path>) -> FfmpegCommand {
    FfmpegCommand::new(input, output).codec_copy().faststart()
}

/// Re-encode one clip to the shared profile: no audio, fixed fps,
/// letterboxed to the target resolution.
pub fn normalize_command(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    profile: &NormalizeProfile,
) -> FfmpegCommand {
    FfmpegCommand::new(input, output)
        .no_audio()
        .frame_rate(profile.fps)
        .video_filter(profile.video_filter())
        .pixel_format(profile.pixel_format.clone())
        .video_codec(profile.codec.clone())
        .preset(profile.preset.clone())
        .crf(profile.crf)
        .faststart()
}

/// Concatenate the files listed in a concat manifest without re-encoding.
pub fn concat_command(manifest: impl AsRef<Path>, output: impl AsRef<Path>) -> FfmpegCommand {
    FfmpegCommand::new(manifest, output)
        .concat_manifest()
        .codec_copy()
        .faststart()
}

/// Exit status and captured standard error of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Trimmed stderr, or `None` if the process printed nothing.
    pub fn stderr_text(&self) -> Option<String> {
        let trimmed = self.stderr.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Executes the transcoder with an argument list.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run to completion. A non-zero exit is reported in [`ProcessOutput`],
    /// not as an error; errors mean the process could not be run at all.
    async fn run(&self, args: &[String], stdin: Option<&[u8]>) -> MediaResult<ProcessOutput>;
}

/// Runs the FFmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    binary: String,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRunner {
    /// Create a runner using `ffmpeg` from PATH.
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }

    /// Use a specific binary name or path.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Create from the `FFMPEG_BIN` environment variable.
    pub fn from_env() -> Self {
        std::env::var("FFMPEG_BIN")
            .map(Self::with_binary)
            .unwrap_or_default()
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

#[async_trait]
impl ProcessRunner for FfmpegRunner {
    async fn run(&self, args: &[String], stdin: Option<&[u8]>) -> MediaResult<ProcessOutput> {
        let binary = which::which(&self.binary)
            .map_err(|_| MediaError::FfmpegNotFound(self.binary.clone()))?;

        debug!("Running FFmpeg: {} {}", self.binary, args.join(" "));

        let mut child = Command::new(binary)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input).await?;
            // Closing stdin signals EOF.
            drop(pipe);
        }

        let output = child.wait_with_output().await?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg(binary: &str) -> MediaResult<PathBuf> {
    which::which(binary).map_err(|_| MediaError::FfmpegNotFound(binary.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(args: &[String], flag: &str) -> usize {
        args.iter().position(|a| a == flag).expect(flag)
    }

    #[test]
    fn test_faststart_args() {
        let args = faststart_command("in.mp4", "out.mp4").build_args();
        assert_eq!(
            args,
            vec![
                "-y", "-v", "error", "-i", "in.mp4", "-c", "copy", "-movflags", "+faststart",
                "out.mp4"
            ]
        );
    }

    #[test]
    fn test_normalize_args() {
        let profile = NormalizeProfile::default();
        let args = normalize_command("src.mp4", "norm.mp4", &profile).build_args();

        assert!(args.contains(&"-an".to_string()));
        assert_eq!(args[position(&args, "-r") + 1], "24");
        assert_eq!(args[position(&args, "-vf") + 1], profile.video_filter());
        assert_eq!(args[position(&args, "-pix_fmt") + 1], "yuv420p");
        assert_eq!(args[position(&args, "-c:v") + 1], "libx264");
        assert_eq!(args[position(&args, "-crf") + 1], "20");
        assert_eq!(args[position(&args, "-movflags") + 1], "+faststart");
        assert!(position(&args, "-i") < position(&args, "-an"));
        assert_eq!(args.last().unwrap(), "norm.mp4");
    }

    #[test]
    fn test_concat_args_read_manifest_before_input() {
        let args = concat_command("list.txt", "film.mp4").build_args();
        let f = position(&args, "-f");
        assert_eq!(args[f + 1], "concat");
        assert_eq!(args[position(&args, "-safe") + 1], "0");
        assert!(f < position(&args, "-i"));
        assert_eq!(args[position(&args, "-i") + 1], "list.txt");
        assert_eq!(args[position(&args, "-c") + 1], "copy");
    }

    #[test]
    fn test_process_output() {
        let ok = ProcessOutput {
            exit_code: Some(0),
            stderr: "  \n".to_string(),
        };
        assert!(ok.success());
        assert_eq!(ok.stderr_text(), None);

        let killed = ProcessOutput {
            exit_code: None,
            stderr: "Killed\n".to_string(),
        };
        assert!(!killed.success());
        assert_eq!(killed.stderr_text().as_deref(), Some("Killed"));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let runner = FfmpegRunner::with_binary("definitely-not-ffmpeg-binary");
        let err = runner.run(&[], None).await.unwrap_err();
        assert!(matches!(err, MediaError::FfmpegNotFound(_)));
    }
}
