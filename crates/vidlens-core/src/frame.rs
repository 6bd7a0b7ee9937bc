//! Frame domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One analyzed frame of a video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    /// 1-based position in the sampled sequence
    pub frame_number: usize,
    pub timestamp_seconds: f64,
    pub description: String,
    #[serde(skip)]
    pub image_bytes: Vec<u8>,
}

impl FrameRecord {
    pub fn new(
        frame_number: usize,
        timestamp_seconds: f64,
        description: String,
        image_bytes: Vec<u8>,
    ) -> Self {
        Self {
            frame_number,
            timestamp_seconds,
            description,
            image_bytes,
        }
    }
}

/// `count` timestamps evenly spaced over `[0, duration)`: `i * duration / count`
pub fn sample_timestamps(duration: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let step = duration.max(0.0) / count as f64;
    (0..count).map(|i| i as f64 * step).collect()
}

/// Output size for extracted frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Resolution {
    /// Keep the source dimensions
    Original,
    /// Scale to this height, preserving aspect ratio
    Height(u32),
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Height(720)
    }
}

impl Resolution {
    /// Target height, or `None` for the source size
    pub fn height(&self) -> Option<u32> {
        match self {
            Resolution::Original => None,
            Resolution::Height(h) => Some(*h),
        }
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("original") {
            return Ok(Resolution::Original);
        }
        let digits = s.strip_suffix('p').or_else(|| s.strip_suffix('P')).unwrap_or(s);
        match digits.parse::<u32>() {
            Ok(h) if h > 0 => Ok(Resolution::Height(h)),
            _ => Err(Error::Validation(format!(
                "Resolution must be 'original' or a height like '720p': {}",
                s
            ))),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.height() {
            None => write!(f, "original"),
            Some(h) => write!(f, "{}p", h),
        }
    }
}

impl From<Resolution> for String {
    fn from(r: Resolution) -> Self {
        r.to_string()
    }
}

impl TryFrom<String> for Resolution {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_timestamps_even_spacing() {
        let ts = sample_timestamps(10.0, 4);
        assert_eq!(ts, vec![0.0, 2.5, 5.0, 7.5]);
        assert!(sample_timestamps(10.0, 0).is_empty());
    }

    #[test]
    fn test_sample_timestamps_stay_below_duration() {
        let ts = sample_timestamps(3.0, 7);
        assert_eq!(ts.len(), 7);
        assert!(ts.iter().all(|t| *t < 3.0));
        assert!(ts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("original".parse::<Resolution>().unwrap(), Resolution::Original);
        assert_eq!("720p".parse::<Resolution>().unwrap(), Resolution::Height(720));
        assert_eq!("1080".parse::<Resolution>().unwrap(), Resolution::Height(1080));
        assert!("0p".parse::<Resolution>().is_err());
        assert!("huge".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::Height(480).to_string(), "480p");
        assert_eq!(Resolution::Original.to_string(), "original");
        assert_eq!(Resolution::default().height(), Some(720));
    }
}
