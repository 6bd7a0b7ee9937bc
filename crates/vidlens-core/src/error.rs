use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Could not read duration of {}: {message}", video.display())]
    Duration { video: PathBuf, message: String },

    /// `duration` is the probed video length in seconds
    #[error("Frame {frame} extraction failed: {message}")]
    Extraction {
        frame: usize,
        duration: f64,
        message: String,
    },

    #[error("Frame {frame} analysis failed: {message}")]
    Analysis {
        frame: usize,
        duration: f64,
        message: String,
    },

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// The 1-based frame number a per-frame failure refers to
    pub fn frame(&self) -> Option<usize> {
        match self {
            Error::Extraction { frame, .. } | Error::Analysis { frame, .. } => Some(*frame),
            _ => None,
        }
    }

    /// Video length in seconds, when it was probed before the failure
    pub fn video_duration(&self) -> Option<f64> {
        match self {
            Error::Extraction { duration, .. } | Error::Analysis { duration, .. } => {
                Some(*duration)
            }
            _ => None,
        }
    }

    /// Whether the error was raised before any work was scheduled
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InputNotFound(_) | Error::MissingCredential(_) | Error::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
