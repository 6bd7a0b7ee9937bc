//! Collaborator traits for frame extraction and vision inference

use std::path::Path;

use async_trait::async_trait;
use vidlens_core::Resolution;

/// Options for extracting a still frame
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// JPEG quality, 1 (worst) to 100 (best)
    pub quality: u8,
    pub resolution: Resolution,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            quality: 85,
            resolution: Resolution::default(),
        }
    }
}

/// Reads video containers and produces still images
#[async_trait]
pub trait FrameExtractor: Send + Sync {
    /// Total duration of the video in seconds
    async fn duration(&self, video: &Path) -> anyhow::Result<f64>;

    /// Write the frame at `timestamp` seconds to `output` as a JPEG
    async fn extract_frame(
        &self,
        video: &Path,
        timestamp: f64,
        options: ExtractOptions,
        output: &Path,
    ) -> anyhow::Result<()>;
}

/// Description and usage returned for one image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameAnalysis {
    pub description: String,
    /// Zero when the service reported no usage
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Vision-capable inference service
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Describe `image` (JPEG bytes) following `prompt`
    async fn describe(&self, image: &[u8], prompt: &str, model: &str) -> anyhow::Result<FrameAnalysis>;
}
