mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::debug;
use vidlens_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_overrides(|name| std::env::var(name).ok());
            config
        }
        None => Config::load()?,
    };
    debug!(
        "Using config {} (model {})",
        cli.config
            .clone()
            .unwrap_or_else(Config::config_path)
            .display(),
        config.model
    );

    match cli.command {
        cli::Commands::Analyze {
            video,
            options,
            frame_concurrency,
            json,
        } => commands::analyze::handle(&config, video, options, frame_concurrency, json).await,
        cli::Commands::Batch {
            videos,
            options,
            video_concurrency,
            frame_concurrency,
            json,
        } => {
            commands::batch::handle(
                &config,
                videos,
                options,
                video_concurrency,
                frame_concurrency,
                json,
            )
            .await
        }
        cli::Commands::Estimate {
            videos,
            options,
            json,
        } => commands::estimate::handle(&config, videos, options, json).await,
        cli::Commands::Models => commands::models::handle(&config),
        cli::Commands::Config => commands::show_config(&config, cli.config.as_deref()),
        cli::Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut cli::Cli::command(),
                "vidlens",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
