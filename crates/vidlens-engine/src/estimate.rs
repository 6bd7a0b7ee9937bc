//! Pre-analysis token and cost estimation
//!
//! One representative frame is extracted per video at the configured quality
//! and resolution, measured, and the per-frame estimate is scaled linearly by
//! the frame count. Videos whose content varies a lot over time will be off
//! by more than videos that look the same throughout.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use vidlens_core::{Error, Result};
use vidlens_sources::FrameExtractor;
use vidlens_tokens::{FrameEstimator, TokenEstimate};

use crate::options::AnalysisOptions;
use crate::pipeline::ensure_exists;
use crate::scratch::ScratchDir;

/// Estimate for analyzing one video
#[derive(Debug, Clone, Serialize)]
pub struct VideoEstimate {
    pub video_path: PathBuf,
    pub duration_seconds: f64,
    pub frame_count: usize,
    pub frame_width: u32,
    pub frame_height: u32,
    pub per_frame: TokenEstimate,
    pub total: TokenEstimate,
}

/// A video that could not be estimated
#[derive(Debug, Clone, Serialize)]
pub struct SkippedVideo {
    pub video_path: PathBuf,
    pub error: String,
}

/// Estimates for several videos; totals cover only the estimated ones
#[derive(Debug, Clone, Default, Serialize)]
pub struct MultiVideoEstimate {
    pub videos: Vec<VideoEstimate>,
    pub skipped: Vec<SkippedVideo>,
    pub total_frames: usize,
    pub total_tokens: u64,
    pub total_cost: f64,
}

impl MultiVideoEstimate {
    fn add(&mut self, estimate: VideoEstimate) {
        self.total_frames += estimate.frame_count;
        self.total_tokens += estimate.total.total_tokens;
        self.total_cost += estimate.total.estimated_cost;
        self.videos.push(estimate);
    }
}

pub struct VideoEstimator {
    extractor: Arc<dyn FrameExtractor>,
    options: AnalysisOptions,
    frames: FrameEstimator,
}

impl VideoEstimator {
    pub fn new(extractor: Arc<dyn FrameExtractor>, options: AnalysisOptions) -> Self {
        let frames = FrameEstimator::new(options.model.clone());
        Self {
            extractor,
            options,
            frames,
        }
    }

    pub fn with_frame_estimator(mut self, frames: FrameEstimator) -> Self {
        self.frames = frames;
        self
    }

    /// Estimate a single prompt + image request without touching a video
    pub fn estimate_frame(&self, width: u32, height: u32) -> TokenEstimate {
        self.frames.estimate(&self.options.prompt, width, height)
    }

    /// Estimate analyzing `video` with the configured frame count
    pub async fn estimate_video(&self, video: &Path) -> Result<VideoEstimate> {
        ensure_exists(video).await?;

        let scratch = ScratchDir::create(&self.options.scratch_root, video).await?;
        let result = self.measure(video, &scratch).await;
        scratch.close().await;

        result
    }

    async fn measure(&self, video: &Path, scratch: &ScratchDir) -> Result<VideoEstimate> {
        let duration = self
            .extractor
            .duration(video)
            .await
            .map_err(|e| Error::Duration {
                video: video.to_path_buf(),
                message: format!("{:#}", e),
            })?;

        let output = scratch.frame_path(1);
        self.extractor
            .extract_frame(video, duration / 2.0, self.options.extract, &output)
            .await
            .map_err(|e| Error::Extraction {
                frame: 1,
                duration,
                message: format!("{:#}", e),
            })?;

        let bytes = tokio::fs::read(&output).await?;
        let (width, height) = image_dimensions(&bytes)?;
        debug!("Representative frame of {} is {}x{}", video.display(), width, height);

        let per_frame = self.frames.estimate(&self.options.prompt, width, height);
        let total = per_frame.scaled(self.options.frames as u64);

        Ok(VideoEstimate {
            video_path: video.to_path_buf(),
            duration_seconds: duration,
            frame_count: self.options.frames,
            frame_width: width,
            frame_height: height,
            per_frame,
            total,
        })
    }

    /// Estimate each video in turn. A video that cannot be estimated is
    /// recorded as skipped and does not stop the others.
    pub async fn estimate_videos(&self, videos: &[PathBuf]) -> MultiVideoEstimate {
        let mut estimate = MultiVideoEstimate::default();

        for video in videos {
            match self.estimate_video(video).await {
                Ok(video_estimate) => estimate.add(video_estimate),
                Err(e) => {
                    warn!("Skipping estimate for {}: {}", video.display(), e);
                    estimate.skipped.push(SkippedVideo {
                        video_path: video.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Estimated {} videos ({} skipped): {} tokens, ${:.4}",
            estimate.videos.len(),
            estimate.skipped.len(),
            estimate.total_tokens,
            estimate.total_cost
        );
        estimate
    }
}

/// Pixel dimensions of an encoded image
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::Image(e.to_string()))?
        .into_dimensions()
        .map_err(|e| Error::Image(e.to_string()))
}
