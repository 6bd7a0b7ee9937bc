//! Per-video analysis pipeline
//!
//! duration -> evenly spaced timestamps -> extract every frame -> describe
//! every frame -> assemble. One failed frame fails the whole video and no
//! partial frame list escapes.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};
use vidlens_core::{
    BoundedPool, Error, FrameRecord, Result, VideoAnalysisState, sample_timestamps,
};
use vidlens_sources::{FrameExtractor, VisionClient};

use crate::options::AnalysisOptions;
use crate::scratch::ScratchDir;

#[derive(Clone)]
pub struct VideoPipeline {
    extractor: Arc<dyn FrameExtractor>,
    vision: Arc<dyn VisionClient>,
    options: AnalysisOptions,
}

impl VideoPipeline {
    pub fn new(
        extractor: Arc<dyn FrameExtractor>,
        vision: Arc<dyn VisionClient>,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            extractor,
            vision,
            options,
        }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Analyze `video` with the configured frame count
    pub async fn analyze(&self, video: &Path) -> Result<VideoAnalysisState> {
        self.analyze_frames(video, self.options.frames).await
    }

    /// Analyze `video` sampling `frame_count` frames
    pub async fn analyze_frames(&self, video: &Path, frame_count: usize) -> Result<VideoAnalysisState> {
        ensure_exists(video).await?;

        let scratch = ScratchDir::create(&self.options.scratch_root, video).await?;
        let result = self.run(video, frame_count, &scratch).await;
        scratch.close().await;

        result
    }

    async fn run(
        &self,
        video: &Path,
        frame_count: usize,
        scratch: &ScratchDir,
    ) -> Result<VideoAnalysisState> {
        let model = &self.options.model;
        info!(
            "Analyzing {} ({} frames, model {})",
            video.display(),
            frame_count,
            model
        );

        let duration = self
            .extractor
            .duration(video)
            .await
            .map_err(|e| Error::Duration {
                video: video.to_path_buf(),
                message: format!("{:#}", e),
            })?;
        let timestamps = sample_timestamps(duration, frame_count);

        // 1. Extract
        let extract_pool = BoundedPool::new(self.options.frame_concurrency);
        let extractions = extract_pool
            .run(timestamps.iter().enumerate().map(|(i, timestamp)| {
                let output = scratch.frame_path(i + 1);
                async move {
                    self.extractor
                        .extract_frame(video, *timestamp, self.options.extract, &output)
                        .await?;
                    let bytes = tokio::fs::read(&output).await?;
                    debug!("Extracted frame {} ({} bytes)", i + 1, bytes.len());
                    Ok::<_, anyhow::Error>(bytes)
                }
            }))
            .await;
        let images = settle_frames(extractions, |frame, message| Error::Extraction {
            frame,
            duration,
            message,
        })?;

        // 2. Describe
        let analysis_pool = BoundedPool::new(self.options.analysis_concurrency());
        let analyses = analysis_pool
            .run(
                images
                    .iter()
                    .enumerate()
                    .map(|(i, image)| async move {
                        let analysis = self.vision.describe(image, &self.options.prompt, model).await;
                        if analysis.is_ok() {
                            debug!("Analyzed frame {}", i + 1);
                        }
                        analysis
                    }),
            )
            .await;
        let analyses = settle_frames(analyses, |frame, message| Error::Analysis {
            frame,
            duration,
            message,
        })?;

        // 3. Assemble
        let mut state = VideoAnalysisState::new(video, model.as_str()).with_duration(duration);
        for (i, ((timestamp, image), analysis)) in timestamps
            .into_iter()
            .zip(images)
            .zip(analyses)
            .enumerate()
        {
            state.push_frame(
                FrameRecord::new(i + 1, timestamp, analysis.description, image),
                analysis.input_tokens,
                analysis.output_tokens,
            );
        }

        info!(
            "Analyzed {}: {} frames, {} input / {} output tokens",
            video.display(),
            state.frame_count(),
            state.input_tokens,
            state.output_tokens
        );
        Ok(state)
    }
}

/// Unwrap per-frame results, failing on the first failed frame in order
fn settle_frames<T>(
    results: Vec<anyhow::Result<T>>,
    error: impl Fn(usize, String) -> Error,
) -> Result<Vec<T>> {
    results
        .into_iter()
        .enumerate()
        .map(|(i, result)| result.map_err(|e| error(i + 1, format!("{:#}", e))))
        .collect()
}

pub(crate) async fn ensure_exists(video: &Path) -> Result<()> {
    if tokio::fs::try_exists(video).await.unwrap_or(false) {
        Ok(())
    } else {
        Err(Error::InputNotFound(video.to_path_buf()))
    }
}
