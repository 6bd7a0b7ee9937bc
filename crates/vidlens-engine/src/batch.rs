//! Batch orchestration across videos
//!
//! Unlike the frame tier, a failed video never fails the batch: it becomes
//! a failed outcome and the remaining videos keep going.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};
use vidlens_core::{BatchState, BoundedPool, UsageStats, VideoOutcome};

use crate::pipeline::VideoPipeline;

/// Everything a batch run produced
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// One entry per input video, in completion order
    pub outcomes: Vec<VideoOutcome>,
    pub succeeded: usize,
    pub failed: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_cost: f64,
    pub elapsed_ms: u64,
}

impl BatchReport {
    fn from_state(state: BatchState, elapsed_ms: u64) -> Self {
        Self {
            outcomes: state.outcomes,
            succeeded: state.succeeded,
            failed: state.failed,
            input_tokens: state.input_tokens,
            output_tokens: state.output_tokens,
            total_cost: state.total_cost,
            elapsed_ms,
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Aggregate statistics over the successful outcomes
    pub fn usage(&self) -> UsageStats {
        let mut stats = UsageStats::new();
        for outcome in &self.outcomes {
            stats.record_outcome(outcome);
        }
        stats
    }

    pub fn failures(&self) -> impl Iterator<Item = &VideoOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

pub struct BatchOrchestrator {
    pipeline: VideoPipeline,
    video_concurrency: usize,
}

impl BatchOrchestrator {
    pub fn new(pipeline: VideoPipeline) -> Self {
        let video_concurrency = pipeline.options().video_concurrency;
        Self {
            pipeline,
            video_concurrency: video_concurrency.max(1),
        }
    }

    /// Override the number of videos analyzed at once (floor 1)
    pub fn with_concurrency(mut self, video_concurrency: usize) -> Self {
        self.video_concurrency = video_concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.video_concurrency
    }

    pub fn pipeline(&self) -> &VideoPipeline {
        &self.pipeline
    }

    /// Analyze every video, admitting a new one whenever a running one
    /// settles.
    pub async fn run(&self, videos: &[PathBuf]) -> BatchReport {
        let start = Instant::now();
        let total = videos.len();
        let model = self.pipeline.options().model.clone();
        let mut state = BatchState::new();

        info!(
            "Starting batch of {} videos ({} at a time)",
            total, self.video_concurrency
        );

        let pool = BoundedPool::new(self.video_concurrency);
        let tasks = videos.iter().enumerate().map(|(index, video)| async move {
            debug!("Admitted video #{}: {}", index + 1, video.display());
            (video, self.pipeline.analyze(video).await)
        });

        pool.drive(tasks, |index, (video, result)| {
            let outcome = match result {
                Ok(analysis) => VideoOutcome::succeeded(analysis),
                Err(e) => {
                    warn!("Video {} failed: {}", video.display(), e);
                    let duration = e.video_duration().unwrap_or(0.0);
                    VideoOutcome::failed(video.clone(), model.as_str(), e).with_duration(duration)
                }
            };
            state.record(outcome);
            info!(
                "[{}/{}] settled video #{} ({} ok, {} failed)",
                state.settled(),
                total,
                index + 1,
                state.succeeded,
                state.failed
            );
        })
        .await;

        BatchReport::from_state(state, start.elapsed().as_millis() as u64)
    }
}
