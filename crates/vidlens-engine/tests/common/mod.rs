#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use vidlens_engine::AnalysisOptions;
use vidlens_sources::{ExtractOptions, FrameAnalysis, FrameExtractor, VisionClient};

pub const INPUT_TOKENS_PER_FRAME: u64 = 100;
pub const OUTPUT_TOKENS_PER_FRAME: u64 = 20;

/// Current and peak concurrent calls
#[derive(Default)]
pub struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Extractor that writes either a tag (`<file>@<timestamp>`) or a PNG
#[derive(Default)]
pub struct MockExtractor {
    /// Duration per file name; missing names report 10s
    pub durations: HashMap<String, f64>,
    /// Fail extraction for this file name at this timestamp
    pub fail_at: Option<(String, f64)>,
    /// Fail duration probing for this file name
    pub fail_duration: Option<String>,
    /// Write a PNG of these dimensions instead of a tag
    pub png: Option<(u32, u32)>,
    /// Sleep per extraction, longer for earlier timestamps
    pub delay_ms: u64,
    pub gauge: Gauge,
    pub extractions: AtomicUsize,
}

fn file_name(video: &Path) -> String {
    video.file_name().unwrap().to_string_lossy().into_owned()
}

#[async_trait]
impl FrameExtractor for MockExtractor {
    async fn duration(&self, video: &Path) -> anyhow::Result<f64> {
        let name = file_name(video);
        if self.fail_duration.as_deref() == Some(name.as_str()) {
            anyhow::bail!("moov atom not found");
        }
        Ok(self.durations.get(&name).copied().unwrap_or(10.0))
    }

    async fn extract_frame(
        &self,
        video: &Path,
        timestamp: f64,
        _options: ExtractOptions,
        output: &Path,
    ) -> anyhow::Result<()> {
        self.gauge.enter();
        self.extractions.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            // Earlier frames take longer so completion order is reversed
            let delay = self.delay_ms + (20.0 - timestamp).max(0.0) as u64;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.gauge.exit();

        let name = file_name(video);
        if let Some((fail_name, fail_ts)) = &self.fail_at {
            if *fail_name == name && (*fail_ts - timestamp).abs() < 1e-9 {
                anyhow::bail!("corrupt packet at {}", timestamp);
            }
        }

        let bytes = match self.png {
            Some((w, h)) => {
                let mut bytes = Vec::new();
                image::RgbImage::new(w, h).write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
                bytes
            }
            None => format!("{}@{}", name, timestamp).into_bytes(),
        };
        tokio::fs::write(output, bytes).await?;
        Ok(())
    }
}

/// Vision client that echoes the image bytes back as the description
#[derive(Default)]
pub struct EchoVision {
    /// Fail when the image tag contains this text
    pub fail_on: Option<String>,
    /// Report no usage
    pub no_usage: bool,
    pub calls: AtomicUsize,
    pub gauge: Gauge,
}

#[async_trait]
impl VisionClient for EchoVision {
    async fn describe(&self, image: &[u8], prompt: &str, _model: &str) -> anyhow::Result<FrameAnalysis> {
        self.gauge.enter();
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(1)).await;
        self.gauge.exit();

        let tag = String::from_utf8_lossy(image).into_owned();
        if let Some(needle) = &self.fail_on {
            if tag.contains(needle.as_str()) {
                anyhow::bail!("rate limited");
            }
        }
        assert!(!prompt.is_empty());

        let (input_tokens, output_tokens) = if self.no_usage {
            (0, 0)
        } else {
            (INPUT_TOKENS_PER_FRAME, OUTPUT_TOKENS_PER_FRAME)
        };
        Ok(FrameAnalysis {
            description: tag,
            input_tokens,
            output_tokens,
        })
    }
}

/// Temp dir holding empty placeholder videos
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn video(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    pub fn scratch_root(&self) -> PathBuf {
        self.dir.path().join("scratch")
    }

    pub fn options(&self, frames: usize) -> AnalysisOptions {
        AnalysisOptions {
            model: "gpt-4.1".to_string(),
            frames,
            scratch_root: self.scratch_root(),
            ..AnalysisOptions::default()
        }
    }

    /// Whether any scratch directory was left behind
    pub fn scratch_is_empty(&self) -> bool {
        match std::fs::read_dir(self.scratch_root()) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => true,
        }
    }
}
