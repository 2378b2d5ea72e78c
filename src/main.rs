//! Subfetch CLI
//!
//! Finds subtitles for local video files by content hash and organizes the library.

use clap::Parser;
use subfetch::cli::{
    args::{Cli, Commands},
    commands::{fetch, hash, languages},
};
use subfetch::models::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Commands::Fetch(args) => {
            let config = match cli.config {
                Some(ref path) => config::load_config_from(path)?,
                None => config::load_config(),
            };

            let summary = fetch::fetch(&args, config).await?;
            if !summary.is_success() {
                anyhow::bail!("{} of {} movies failed", summary.counts.failed, summary.counts.discovered);
            }
        }

        Commands::Hash { file } => {
            hash::hash(&file)?;
        }

        Commands::Languages => {
            languages::list_languages();
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("subfetch=debug")
    } else {
        EnvFilter::new("subfetch=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
