//! Tagline CLI - caption files for per-subject image datasets.
//!
//! Tagline walks a dataset root whose subfolders name their subjects
//! (`ceylon_junglefowl/`, `sigiriya_fort/`, ...) and writes a `.txt`
//! caption next to every image.
//!
//! # Usage
//!
//! ```bash
//! # Caption a dataset using the default (Ollama) vision model
//! tagline caption ~/datasets/images
//!
//! # Template captions only, reproducible
//! tagline caption ./images --no-model --seed 42
//!
//! # View configuration
//! tagline config show
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Tagline - caption files for per-subject image datasets.
#[derive(Parser, Debug)]
#[command(name = "tagline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a caption sidecar for every image under a dataset root
    Caption(cli::caption::CaptionArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let loaded = tagline_core::Config::load();
    if let Err(e) = &loaded {
        eprintln!(
            "Warning: Failed to load config: {e}\n  \
             Check your config file with `tagline config check`."
        );
    }
    let log_config = loaded.as_ref().cloned().unwrap_or_default();
    logging::init_from_config(&log_config, cli.verbose, cli.json_logs);

    tracing::debug!("Tagline v{}", tagline_core::VERSION);

    match cli.command {
        Commands::Caption(args) => {
            let config = loaded.context("Refusing to caption with an invalid config file")?;
            cli::caption::execute(args, config).await
        }
        Commands::Config(args) => cli::config::execute(args),
    }
}
