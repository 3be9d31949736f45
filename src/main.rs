//! Palmer ML - Main Entry Point

use clap::Parser;
use palmerml::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palmerml=info".into()),
        )
        .init();

    let cli = Cli::parse();
    cli::run(&cli)?;

    Ok(())
}
