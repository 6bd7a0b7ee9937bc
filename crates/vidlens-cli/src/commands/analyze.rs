use std::path::PathBuf;

use anyhow::Result;
use vidlens_config::Config;
use vidlens_core::VideoAnalysisState;

use super::{build_pipeline, format_duration, resolve_options};
use crate::cli::AnalysisArgs;

pub async fn handle(
    config: &Config,
    video: PathBuf,
    args: AnalysisArgs,
    frame_concurrency: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut options = resolve_options(config, &args);
    if let Some(limit) = frame_concurrency {
        options.frame_concurrency = limit.max(1);
    }

    let pipeline = build_pipeline(config, options)?;
    let state = pipeline.analyze(&video).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_analysis(&state);
    }

    Ok(())
}

fn print_analysis(state: &VideoAnalysisState) {
    println!("✓ Analyzed: {}", state.video_path.display());
    println!("  Duration: {}", format_duration(state.duration_seconds));
    println!("  Model: {}", state.model);
    println!();

    for frame in &state.frames {
        println!(
            "Frame {} @ {}",
            frame.frame_number,
            format_duration(frame.timestamp_seconds)
        );
        println!("  {}", frame.description.trim());
        println!();
    }

    println!(
        "Tokens: {} input, {} output ({} total)",
        state.input_tokens,
        state.output_tokens,
        state.total_tokens()
    );
    println!("Cost: ${:.4}", state.cost(false));
}
