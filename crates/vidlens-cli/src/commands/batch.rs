use std::path::PathBuf;

use anyhow::Result;
use vidlens_config::Config;
use vidlens_engine::{BatchOrchestrator, BatchReport};

use super::{build_pipeline, resolve_options};
use crate::cli::AnalysisArgs;

pub async fn handle(
    config: &Config,
    videos: Vec<PathBuf>,
    args: AnalysisArgs,
    video_concurrency: Option<usize>,
    frame_concurrency: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut options = resolve_options(config, &args);
    if let Some(limit) = video_concurrency {
        options.video_concurrency = limit.max(1);
    }
    if let Some(limit) = frame_concurrency {
        options.frame_concurrency = limit.max(1);
    }

    let orchestrator = BatchOrchestrator::new(build_pipeline(config, options)?);
    let report = orchestrator.run(&videos).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.succeeded == 0 && report.failed > 0 {
        anyhow::bail!("All {} videos failed", report.failed);
    }

    Ok(())
}

fn print_report(report: &BatchReport) {
    for outcome in &report.outcomes {
        match &outcome.error {
            None => println!(
                "✓ {} ({} frames, {} tokens, ${:.4})",
                outcome.video_path.display(),
                outcome.frames.len(),
                outcome.total_tokens(),
                outcome.cost()
            ),
            Some(error) => println!("✗ {}: {}", outcome.video_path.display(), error),
        }
    }

    let usage = report.usage();
    println!();
    println!(
        "Batch complete: {} succeeded, {} failed in {:.1}s",
        report.succeeded,
        report.failed,
        report.elapsed_ms as f64 / 1000.0
    );
    println!(
        "  Tokens: {} input, {} output ({} total)",
        report.input_tokens,
        report.output_tokens,
        report.total_tokens()
    );
    if usage.total_videos > 0 {
        println!(
            "  Average: {:.0} tokens/video, {:.0} tokens/frame",
            usage.average_tokens_per_video(),
            usage.average_tokens_per_frame()
        );
    }
    println!("  Cost: ${:.4}", report.total_cost);
}
