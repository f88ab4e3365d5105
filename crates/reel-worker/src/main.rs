//! Shot generation / film assembly worker binary.
//!
//! Usage: `reel-worker <job.json>`. The job result is printed to stdout as JSON.

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reel_media::check_ffmpeg;
use reel_worker::{JobFile, JobRunner, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    // Logs go to stderr; stdout carries the job result.
    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }

    let Some(job_path) = std::env::args().nth(1) else {
        bail!("usage: reel-worker <job.json>");
    };

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    if let Err(e) = check_ffmpeg(&config.ffmpeg_bin) {
        warn!("FFmpeg unavailable, clip caching and assembly will fail: {}", e);
    }

    let job = JobFile::load(&job_path)
        .await
        .with_context(|| format!("failed to load job file {}", job_path))?;
    let runner = JobRunner::from_config(&config).context("failed to initialise worker")?;

    let job_id = uuid::Uuid::new_v4().to_string();
    let output = runner.run(&job, &job_id).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
