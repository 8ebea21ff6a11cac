//! Docshot CLI - normalize screenshots for documentation.
//!
//! Docshot resizes screenshots to a fixed width preset, frames them with a
//! thin border and writes them with DPI metadata, one file or a whole
//! directory at a time.
//!
//! # Usage
//!
//! ```bash
//! # Process a single screenshot
//! docshot process -i shot.png
//!
//! # Process a directory of charts at 1920px, as JPEG
//! docshot process -i ./captures/ -s large -t viz --format jpg
//!
//! # View configuration
//! docshot config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Docshot - normalize screenshots for documentation.
#[derive(Parser, Debug)]
#[command(name = "docshot")]
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
    /// Resize, frame and re-encode screenshots
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match docshot_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `docshot config path`."
            );
            docshot_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Docshot v{}", docshot_core::VERSION);

    match cli.command {
        Commands::Process(args) => cli::process::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
