//! Learnpath CLI
//!
//! Semantic search over learning resources, plus plan and quiz generation.

use anyhow::Result;
use clap::Parser;
use learnpath_core::{Config, VectorIndex};

mod app;
mod commands;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    let config = Config::load()?;

    // Open index (use LEARNPATH_INDEX env var if set, otherwise use default)
    let index_path = std::env::var("LEARNPATH_INDEX")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| VectorIndex::default_path());
    let index = VectorIndex::open(&index_path)?;
    index.initialize()?;

    match cli.command {
        Commands::Ingest(args) => commands::ingest::run(args, &index, &config).await,
        Commands::Search(args) => commands::search::run(args, &index, &config, cli.format).await,
        Commands::Plan(args) => commands::plan::run(args, &index, &config, cli.format).await,
        Commands::Quiz(args) => commands::quiz::run(args, &index, &config, cli.format).await,
        Commands::Status => commands::status::run(&index, &config, cli.format).await,
    }
}
