pub mod analyze;
pub mod batch;
pub mod estimate;
pub mod models;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use vidlens_config::Config;
use vidlens_engine::{AnalysisOptions, VideoPipeline};
use vidlens_sources::{FfmpegExtractor, OpenAiVisionClient};

use crate::cli::AnalysisArgs;

/// Configured options with command-line overrides applied
pub fn resolve_options(config: &Config, args: &AnalysisArgs) -> AnalysisOptions {
    let mut options = config.analysis_options();

    if let Some(frames) = args.frames {
        options.frames = frames;
    }
    if let Some(model) = &args.model {
        options.model = model.clone();
    }
    if let Some(quality) = args.quality {
        options.extract.quality = quality;
    }
    if let Some(resolution) = args.resolution {
        options.extract.resolution = resolution;
    }
    if let Some(prompt) = &args.prompt {
        options.prompt = prompt.clone();
    }

    options
}

/// Build a pipeline backed by ffmpeg and the configured vision endpoint.
/// Fails before any work if ffmpeg or the API key is missing.
pub fn build_pipeline(config: &Config, options: AnalysisOptions) -> Result<VideoPipeline> {
    let extractor = FfmpegExtractor::new()?;
    let vision = OpenAiVisionClient::new(config.api.key.clone(), Some(config.api.base.clone()))?;
    Ok(VideoPipeline::new(
        Arc::new(extractor),
        Arc::new(vision),
        options,
    ))
}

pub fn show_config(config: &Config, path: Option<&Path>) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_path);

    println!("Config file: {}", path.display());
    println!();
    print!("{}", toml::to_string_pretty(&config.redacted())?);

    if config.api.key.is_none() {
        println!("\n(no API key configured; set {})", vidlens_config::API_KEY_ENV);
    }

    Ok(())
}

pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}
