//! Usage accumulators

use serde::Serialize;

use crate::video::{VideoAnalysisState, VideoOutcome};

/// Running totals over successfully analyzed videos
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageStats {
    pub total_videos: usize,
    pub total_frames: usize,
    pub total_duration_seconds: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_cost: f64,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, state: &VideoAnalysisState) {
        self.total_videos += 1;
        self.total_frames += state.frame_count();
        self.total_duration_seconds += state.duration();
        self.input_tokens += state.input_tokens;
        self.output_tokens += state.output_tokens;
        self.total_cost += state.cost(false);
    }

    /// Record a batch outcome; failed outcomes are ignored
    pub fn record_outcome(&mut self, outcome: &VideoOutcome) {
        if !outcome.is_success() {
            return;
        }
        self.total_videos += 1;
        self.total_frames += outcome.frames.len();
        self.total_duration_seconds += outcome.duration_seconds;
        self.input_tokens += outcome.input_tokens;
        self.output_tokens += outcome.output_tokens;
        self.total_cost += outcome.cost();
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    pub fn average_tokens_per_video(&self) -> f64 {
        if self.total_videos == 0 {
            return 0.0;
        }
        self.total_tokens() as f64 / self.total_videos as f64
    }

    pub fn average_tokens_per_frame(&self) -> f64 {
        if self.total_frames == 0 {
            return 0.0;
        }
        self.total_tokens() as f64 / self.total_frames as f64
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Accumulator owned by one batch run
#[derive(Debug, Clone, Default)]
pub struct BatchState {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_cost: f64,
    pub outcomes: Vec<VideoOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a settled video. Only successful outcomes count toward usage.
    pub fn record(&mut self, outcome: VideoOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
            self.input_tokens += outcome.input_tokens;
            self.output_tokens += outcome.output_tokens;
            self.total_cost += outcome.cost();
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn settled(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameRecord;

    fn analyzed(path: &str, frames: usize, tokens: u64) -> VideoAnalysisState {
        let mut state = VideoAnalysisState::new(path, "gpt-4.1").with_duration(30.0);
        for i in 0..frames {
            state.push_frame(FrameRecord::new(0, i as f64, String::new(), Vec::new()), tokens, 0);
        }
        state
    }

    #[test]
    fn test_usage_averages() {
        let mut stats = UsageStats::new();
        assert_eq!(stats.average_tokens_per_video(), 0.0);
        assert_eq!(stats.average_tokens_per_frame(), 0.0);

        stats.record(&analyzed("a.mp4", 2, 100));
        stats.record(&analyzed("b.mp4", 4, 100));

        assert_eq!(stats.total_videos, 2);
        assert_eq!(stats.total_frames, 6);
        assert_eq!(stats.total_duration_seconds, 60.0);
        assert_eq!(stats.total_tokens(), 600);
        assert_eq!(stats.average_tokens_per_video(), 300.0);
        assert_eq!(stats.average_tokens_per_frame(), 100.0);
        assert!(stats.total_cost > 0.0);
    }

    #[test]
    fn test_usage_ignores_failed_outcomes() {
        let mut stats = UsageStats::new();
        stats.record_outcome(&VideoOutcome::succeeded(analyzed("a.mp4", 2, 10)));
        stats.record_outcome(&VideoOutcome::failed("b.mp4", "gpt-4.1", "boom"));

        assert_eq!(stats.total_videos, 1);
        assert_eq!(stats.total_frames, 2);
        assert_eq!(stats.total_tokens(), 20);
    }

    #[test]
    fn test_usage_reset_is_idempotent() {
        let mut stats = UsageStats::new();
        stats.record(&analyzed("a.mp4", 3, 10));

        stats.reset();
        assert_eq!(stats, UsageStats::default());
        stats.reset();
        assert_eq!(stats, UsageStats::default());
    }

    #[test]
    fn test_batch_state_counts_only_successes() {
        let mut batch = BatchState::new();
        batch.record(VideoOutcome::succeeded(analyzed("a.mp4", 1, 50)));
        batch.record(VideoOutcome::failed("b.mp4", "gpt-4.1", "boom"));

        assert_eq!(batch.succeeded, 1);
        assert_eq!(batch.failed, 1);
        assert_eq!(batch.settled(), 2);
        assert_eq!(batch.input_tokens, 50);
        assert_eq!(batch.outcomes.len(), 2);
    }

    #[test]
    fn test_batch_state_reset() {
        let mut batch = BatchState::new();
        batch.record(VideoOutcome::succeeded(analyzed("a.mp4", 1, 50)));

        for _ in 0..2 {
            batch.reset();
            assert_eq!(batch.input_tokens, 0);
            assert_eq!(batch.output_tokens, 0);
            assert_eq!(batch.total_cost, 0.0);
            assert_eq!(batch.settled(), 0);
            assert!(batch.outcomes.is_empty());
        }
    }
}
