use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vidlens_core::Resolution;
use vidlens_engine::{
    AnalysisOptions, DEFAULT_FRAME_CONCURRENCY, DEFAULT_FRAMES, DEFAULT_PROMPT,
    DEFAULT_VIDEO_CONCURRENCY,
};
use vidlens_sources::{DEFAULT_API_BASE, ExtractOptions};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "VIDLENS_MODEL";

/// Configuration for vidlens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_frames")]
    pub frames: usize,

    #[serde(default = "default_prompt")]
    pub prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,

    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub concurrency: ConcurrencyConfig,

    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// JPEG quality, 1-100
    #[serde(default = "default_quality")]
    pub quality: u8,

    #[serde(default)]
    pub resolution: Resolution,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    #[serde(default = "default_video_concurrency")]
    pub videos: usize,

    #[serde(default = "default_frame_concurrency")]
    pub frames: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base")]
    pub base: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            frames: default_frames(),
            prompt: default_prompt(),
            scratch_dir: None,
            extract: ExtractConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            quality: default_quality(),
            resolution: Resolution::default(),
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            videos: default_video_concurrency(),
            frames: default_frame_concurrency(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base: default_api_base(),
            key: None,
        }
    }
}

fn default_model() -> String {
    vidlens_tokens::DEFAULT_MODEL.to_string()
}

fn default_frames() -> usize {
    DEFAULT_FRAMES
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_quality() -> u8 {
    85
}

fn default_video_concurrency() -> usize {
    DEFAULT_VIDEO_CONCURRENCY
}

fn default_frame_concurrency() -> usize {
    DEFAULT_FRAME_CONCURRENCY
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Config {
    /// Load config from default location or create default if not found,
    /// then apply environment overrides
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            config
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load config from an explicit file without environment overrides
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "vidlens", "vidlens") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.vidlens/config.toml")
        }
    }

    /// Apply `OPENAI_API_KEY` and `VIDLENS_MODEL` from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.api.key = Some(key);
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.is_empty()) {
            self.model = model;
        }
    }

    /// Engine settings, with concurrency limits floored at 1
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            model: self.model.clone(),
            frames: self.frames,
            prompt: self.prompt.clone(),
            extract: ExtractOptions {
                quality: self.extract.quality.clamp(1, 100),
                resolution: self.extract.resolution,
            },
            frame_concurrency: self.concurrency.frames.max(1),
            analysis_concurrency: None,
            video_concurrency: self.concurrency.videos.max(1),
            scratch_root: self
                .scratch_dir
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join("vidlens")),
        }
    }

    /// Copy safe to print
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.api.key.is_some() {
            config.api.key = Some("***".to_string());
        }
        config
    }
}
