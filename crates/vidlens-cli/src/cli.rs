use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use vidlens_core::Resolution;

#[derive(Parser)]
#[command(name = "vidlens")]
#[command(about = "Describe video frames with a vision model and track what it costs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a single video
    Analyze {
        /// Video file
        video: PathBuf,

        #[command(flatten)]
        options: AnalysisArgs,

        /// Frames extracted at once
        #[arg(long)]
        frame_concurrency: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Analyze several videos concurrently
    Batch {
        /// Video files
        #[arg(required = true)]
        videos: Vec<PathBuf>,

        #[command(flatten)]
        options: AnalysisArgs,

        /// Videos analyzed at once (default from config: 3)
        #[arg(long)]
        video_concurrency: Option<usize>,

        /// Frames extracted at once per video (default from config: 5)
        #[arg(long)]
        frame_concurrency: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Estimate tokens and cost without calling the vision model
    Estimate {
        /// Video files
        #[arg(required = true)]
        videos: Vec<PathBuf>,

        #[command(flatten)]
        options: AnalysisArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List known models and their pricing
    Models,

    /// Show the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

/// Per-run overrides of configured analysis settings
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Frames to sample per video
    #[arg(short, long)]
    pub frames: Option<usize>,

    /// Vision model
    #[arg(short, long)]
    pub model: Option<String>,

    /// JPEG quality, 1-100
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Frame height (e.g. 720p) or "original"
    #[arg(long)]
    pub resolution: Option<Resolution>,

    /// Prompt sent with every frame
    #[arg(long)]
    pub prompt: Option<String>,
}
