use std::collections::HashMap;
use std::path::{Path, PathBuf};

use vidlens_core::{Result, UsageStats, VideoAnalysisState};

use crate::pipeline::VideoPipeline;

/// Analyzed videos keyed by path. Re-registering a path replaces its state.
#[derive(Debug, Default)]
pub struct VideoRegistry {
    videos: HashMap<PathBuf, VideoAnalysisState>,
}

impl VideoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `state`, returning the state it replaced
    pub fn insert(&mut self, state: VideoAnalysisState) -> Option<VideoAnalysisState> {
        self.videos.insert(state.video_path.clone(), state)
    }

    pub fn get(&self, video: &Path) -> Option<&VideoAnalysisState> {
        self.videos.get(video)
    }

    pub fn remove(&mut self, video: &Path) -> Option<VideoAnalysisState> {
        self.videos.remove(video)
    }

    pub fn contains(&self, video: &Path) -> bool {
        self.videos.contains_key(video)
    }

    /// Registered paths, sorted
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.videos.keys().map(PathBuf::as_path).collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn clear(&mut self) {
        self.videos.clear();
    }

    pub fn stats(&self) -> UsageStats {
        let mut stats = UsageStats::new();
        for state in self.videos.values() {
            stats.record(state);
        }
        stats
    }

    /// Run the pipeline on `video` and register the result. On failure the
    /// previously registered state, if any, is kept.
    pub async fn analyze(
        &mut self,
        pipeline: &VideoPipeline,
        video: &Path,
    ) -> Result<&VideoAnalysisState> {
        let state = pipeline.analyze(video).await?;
        let key = state.video_path.clone();
        self.videos.insert(key.clone(), state);
        Ok(&self.videos[&key])
    }
}
