//! Core domain models for vidlens
//!
//! This crate contains:
//! - Domain models (FrameRecord, VideoAnalysisState, VideoOutcome)
//! - Usage accumulators (UsageStats, BatchState)
//! - The bounded concurrency pool shared by the frame and video tiers

pub mod error;
pub mod frame;
pub mod pool;
pub mod stats;
pub mod video;

pub use error::{Error, Result};
pub use frame::{FrameRecord, Resolution, sample_timestamps};
pub use pool::BoundedPool;
pub use stats::{BatchState, UsageStats};
pub use video::{VideoAnalysisState, VideoOutcome};
