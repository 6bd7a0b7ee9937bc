//! External collaborators for vidlens
//!
//! - [`FrameExtractor`]: duration probing and still-frame extraction
//! - [`VisionClient`]: image description through a vision model

pub mod ffmpeg;
pub mod handler;
pub mod openai;

pub use ffmpeg::FfmpegExtractor;
pub use handler::{ExtractOptions, FrameAnalysis, FrameExtractor, VisionClient};
pub use openai::{DEFAULT_API_BASE, OpenAiVisionClient};
