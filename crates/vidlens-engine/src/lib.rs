//! Analysis engine for vidlens
//!
//! - [`VideoPipeline`]: frames of one video, extracted and described
//!   through two bounded pools; fails as a unit
//! - [`BatchOrchestrator`]: many pipelines under a video-level limit, with
//!   failures isolated per video
//! - [`VideoEstimator`]: token and cost predictions without inference calls
//! - [`VideoRegistry`]: analyzed videos keyed by path

pub mod batch;
pub mod estimate;
pub mod options;
pub mod pipeline;
pub mod registry;
pub mod scratch;

pub use batch::{BatchOrchestrator, BatchReport};
pub use estimate::{MultiVideoEstimate, SkippedVideo, VideoEstimate, VideoEstimator, image_dimensions};
pub use options::{
    AnalysisOptions, DEFAULT_FRAME_CONCURRENCY, DEFAULT_FRAMES, DEFAULT_PROMPT,
    DEFAULT_VIDEO_CONCURRENCY,
};
pub use pipeline::VideoPipeline;
pub use registry::VideoRegistry;
pub use scratch::ScratchDir;
