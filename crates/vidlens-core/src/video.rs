//! Video analysis state and per-video outcomes

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::frame::FrameRecord;

/// Result of analyzing one video end to end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAnalysisState {
    pub video_path: PathBuf,
    pub duration_seconds: f64,
    pub frames: Vec<FrameRecord>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub model: String,
    #[serde(with = "time::serde::timestamp")]
    pub analyzed_at: OffsetDateTime,
}

impl VideoAnalysisState {
    pub fn new(video_path: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            video_path: video_path.into(),
            duration_seconds: 0.0,
            frames: Vec::new(),
            input_tokens: 0,
            output_tokens: 0,
            model: model.into(),
            analyzed_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn with_duration(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    /// Append the next frame and add its usage to the running totals.
    ///
    /// Frames must arrive in order; `frame.frame_number` is overwritten
    /// with the next contiguous number.
    pub fn push_frame(&mut self, mut frame: FrameRecord, input_tokens: u64, output_tokens: u64) {
        frame.frame_number = self.frames.len() + 1;
        self.frames.push(frame);
        self.input_tokens += input_tokens;
        self.output_tokens += output_tokens;
    }

    /// Drop frames and usage ahead of a re-analysis
    pub fn reset(&mut self) {
        self.frames.clear();
        self.input_tokens = 0;
        self.output_tokens = 0;
    }

    pub fn path(&self) -> &Path {
        &self.video_path
    }

    pub fn duration(&self) -> f64 {
        self.duration_seconds
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Cost in USD of the recorded usage under this state's model
    pub fn cost(&self, cached_input: bool) -> f64 {
        vidlens_tokens::calculate_cost(
            self.input_tokens,
            self.output_tokens,
            &self.model,
            cached_input,
        )
    }
}

/// What happened to one video in a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoOutcome {
    pub video_path: PathBuf,
    pub model: String,
    pub duration_seconds: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub frames: Vec<FrameRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VideoOutcome {
    pub fn succeeded(state: VideoAnalysisState) -> Self {
        Self {
            video_path: state.video_path,
            model: state.model,
            duration_seconds: state.duration_seconds,
            input_tokens: state.input_tokens,
            output_tokens: state.output_tokens,
            frames: state.frames,
            error: None,
        }
    }

    /// A failed outcome carries no usage and no frames
    pub fn failed(video_path: impl Into<PathBuf>, model: impl Into<String>, error: impl ToString) -> Self {
        Self {
            video_path: video_path.into(),
            model: model.into(),
            duration_seconds: 0.0,
            input_tokens: 0,
            output_tokens: 0,
            frames: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// Record the video length known at the time of failure
    pub fn with_duration(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    pub fn cost(&self) -> f64 {
        vidlens_tokens::calculate_cost(self.input_tokens, self.output_tokens, &self.model, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(desc: &str) -> FrameRecord {
        FrameRecord::new(0, 0.0, desc.to_string(), Vec::new())
    }

    #[test]
    fn test_push_frame_numbers_contiguously() {
        let mut state = VideoAnalysisState::new("a.mp4", "gpt-4.1");
        state.push_frame(frame("one"), 100, 10);
        state.push_frame(frame("two"), 120, 12);

        let numbers: Vec<usize> = state.frames.iter().map(|f| f.frame_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(state.input_tokens, 220);
        assert_eq!(state.output_tokens, 22);
        assert_eq!(state.total_tokens(), 242);
    }

    #[test]
    fn test_reset_clears_usage() {
        let mut state = VideoAnalysisState::new("a.mp4", "gpt-4.1").with_duration(12.0);
        state.push_frame(frame("x"), 5, 5);
        state.reset();
        state.reset();

        assert_eq!(state.frame_count(), 0);
        assert_eq!(state.total_tokens(), 0);
        assert_eq!(state.duration(), 12.0);
    }

    #[test]
    fn test_failed_outcome_has_no_usage() {
        let outcome = VideoOutcome::failed("b.mp4", "gpt-4.1", "boom");
        assert!(!outcome.is_success());
        assert_eq!(outcome.total_tokens(), 0);
        assert!(outcome.frames.is_empty());
        assert_eq!(outcome.error.as_deref(), Some("boom"));
        assert_eq!(outcome.duration_seconds, 0.0);
        assert_eq!(outcome.with_duration(8.0).duration_seconds, 8.0);
    }

    #[test]
    fn test_outcome_serialization_skips_image_bytes() {
        let mut state = VideoAnalysisState::new("a.mp4", "gpt-4.1");
        state.push_frame(FrameRecord::new(0, 1.5, "d".into(), vec![1, 2, 3]), 1, 1);

        let json = serde_json::to_value(VideoOutcome::succeeded(state)).unwrap();
        assert!(json["frames"][0].get("image_bytes").is_none());
        assert!(json.get("error").is_none());
    }
}
