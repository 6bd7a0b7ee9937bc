use std::path::PathBuf;

use vidlens_sources::ExtractOptions;

pub const DEFAULT_PROMPT: &str = "Describe what is happening in this video frame. \
Mention the main subjects, their actions, the setting, and any visible text.";

pub const DEFAULT_FRAMES: usize = 10;
pub const DEFAULT_VIDEO_CONCURRENCY: usize = 3;
pub const DEFAULT_FRAME_CONCURRENCY: usize = 5;

/// Settings shared by analysis and estimation runs
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub model: String,
    /// Frames sampled per video
    pub frames: usize,
    pub prompt: String,
    pub extract: ExtractOptions,
    /// In-flight extractions per video
    pub frame_concurrency: usize,
    /// In-flight vision requests per video; `None` reuses `frame_concurrency`
    pub analysis_concurrency: Option<usize>,
    /// In-flight videos per batch
    pub video_concurrency: usize,
    /// Parent of per-run scratch directories
    pub scratch_root: PathBuf,
}

impl AnalysisOptions {
    pub fn analysis_concurrency(&self) -> usize {
        self.analysis_concurrency.unwrap_or(self.frame_concurrency).max(1)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_frames(mut self, frames: usize) -> Self {
        self.frames = frames;
        self
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            model: vidlens_tokens::DEFAULT_MODEL.to_string(),
            frames: DEFAULT_FRAMES,
            prompt: DEFAULT_PROMPT.to_string(),
            extract: ExtractOptions::default(),
            frame_concurrency: DEFAULT_FRAME_CONCURRENCY,
            analysis_concurrency: None,
            video_concurrency: DEFAULT_VIDEO_CONCURRENCY,
            scratch_root: std::env::temp_dir().join("vidlens"),
        }
    }
}
