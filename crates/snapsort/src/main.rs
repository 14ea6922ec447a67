//! Snapsort CLI - sort images into label folders with a vision-language model.
//!
//! Snapsort classifies every image in a directory against a user-supplied
//! label set and moves each one into a subfolder named after its
//! best-matching label.
//!
//! # Usage
//!
//! ```bash
//! # Sort a directory against the labels in labels.json
//! snapsort sort ./photos --labels labels.json
//!
//! # Write a machine-readable run report
//! snapsort sort ./photos --labels labels.json --output report.jsonl --format jsonl
//!
//! # View configuration
//! snapsort config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Snapsort - sort images into label folders with a vision-language model.
#[derive(Parser, Debug)]
#[command(name = "snapsort")]
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
    /// Classify images in a directory and move them into label folders
    Sort(cli::sort::SortArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match snapsort_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `snapsort config path`."
            );
            snapsort_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Snapsort v{}", snapsort_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Sort(args) => cli::sort::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
