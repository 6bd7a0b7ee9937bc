use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use vidlens_config::Config;
use vidlens_engine::{MultiVideoEstimate, VideoEstimator};
use vidlens_sources::FfmpegExtractor;
use vidlens_tokens::PricingTable;

use super::{format_duration, resolve_options};
use crate::cli::AnalysisArgs;

pub async fn handle(
    config: &Config,
    videos: Vec<PathBuf>,
    args: AnalysisArgs,
    json: bool,
) -> Result<()> {
    let options = resolve_options(config, &args);
    let model = options.model.clone();

    let estimator = VideoEstimator::new(Arc::new(FfmpegExtractor::new()?), options);
    let estimate = estimator.estimate_videos(&videos).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        print_estimate(&estimate, &model);
    }

    Ok(())
}

fn print_estimate(estimate: &MultiVideoEstimate, model: &str) {
    let pricing = PricingTable::resolve(model);
    if pricing.fallback {
        println!(
            "Note: no pricing for '{}', using {} rates",
            model, pricing.model
        );
        println!();
    }

    for video in &estimate.videos {
        println!("✓ {}", video.video_path.display());
        println!(
            "  Duration: {}, frames: {} at {}x{}",
            format_duration(video.duration_seconds),
            video.frame_count,
            video.frame_width,
            video.frame_height
        );
        println!(
            "  Per frame: {} tokens ({} text + {} image + output)",
            video.per_frame.total_tokens, video.per_frame.text_tokens, video.per_frame.image_tokens
        );
        println!(
            "  Total: {} tokens, ${:.4}",
            video.total.total_tokens, video.total.estimated_cost
        );
    }

    for skipped in &estimate.skipped {
        println!("✗ {}: {}", skipped.video_path.display(), skipped.error);
    }

    println!();
    println!(
        "Estimated {} frames across {} videos: {} tokens, ${:.4}",
        estimate.total_frames,
        estimate.videos.len(),
        estimate.total_tokens,
        estimate.total_cost
    );
}
