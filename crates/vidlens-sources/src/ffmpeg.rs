use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use vidlens_core::{Error, Result};

use crate::handler::{ExtractOptions, FrameExtractor};

/// Frame extraction through the ffmpeg and ffprobe binaries
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegExtractor {
    /// Locate ffmpeg and ffprobe on PATH
    pub fn new() -> Result<Self> {
        let ffmpeg = which::which("ffmpeg")
            .map_err(|_| Error::Validation("ffmpeg not found on PATH".to_string()))?;
        let ffprobe = which::which("ffprobe")
            .map_err(|_| Error::Validation("ffprobe not found on PATH".to_string()))?;
        Ok(Self::with_binaries(ffmpeg, ffprobe))
    }

    pub fn with_binaries(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }
}

#[async_trait]
impl FrameExtractor for FfmpegExtractor {
    async fn duration(&self, video: &Path) -> anyhow::Result<f64> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(video)
            .output()
            .await
            .context("Failed to run ffprobe")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffprobe failed: {}", stderr.trim());
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }

    async fn extract_frame(
        &self,
        video: &Path,
        timestamp: f64,
        options: ExtractOptions,
        output: &Path,
    ) -> anyhow::Result<()> {
        debug!("Extracting {} @ {:.3}s", video.display(), timestamp);

        let result = Command::new(&self.ffmpeg)
            .args(frame_args(video, timestamp, options, output))
            .output()
            .await
            .context("Failed to run ffmpeg")?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            bail!("ffmpeg failed at {:.3}s: {}", timestamp, last_line(&stderr));
        }

        if !output.exists() {
            bail!("ffmpeg produced no frame at {:.3}s", timestamp);
        }

        Ok(())
    }
}

/// Map 1..=100 quality onto ffmpeg's JPEG scale, where 2 is best and 31 worst
pub fn qscale(quality: u8) -> u8 {
    let quality = quality.clamp(1, 100) as u32;
    (31 - (quality - 1) * 29 / 99) as u8
}

fn frame_args(video: &Path, timestamp: f64, options: ExtractOptions, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-ss".into(),
        format!("{:.3}", timestamp).into(),
        "-i".into(),
        video.as_os_str().to_owned(),
        "-frames:v".into(),
        "1".into(),
        "-q:v".into(),
        qscale(options.quality).to_string().into(),
    ];

    if let Some(height) = options.resolution.height() {
        args.push("-vf".into());
        args.push(format!("scale=-2:{}", height).into());
    }

    args.push("-y".into());
    args.push(output.as_os_str().to_owned());
    args
}

fn parse_duration(stdout: &str) -> anyhow::Result<f64> {
    let text = stdout.trim();
    let duration: f64 = text
        .parse()
        .with_context(|| format!("Unexpected ffprobe duration output: {:?}", text))?;

    if !duration.is_finite() || duration < 0.0 {
        bail!("Invalid duration: {}", duration);
    }
    Ok(duration)
}

fn last_line(stderr: &str) -> &str {
    stderr.trim().lines().last().unwrap_or("unknown error")
}
