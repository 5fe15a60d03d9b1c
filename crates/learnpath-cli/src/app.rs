//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "learnpath")]
#[command(
    author,
    version,
    about = "Semantic search and learning-plan generation over curated resources"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest resources from a JSON file into the index
    Ingest(IngestArgs),

    /// Search the resource index
    Search(SearchArgs),

    /// Generate a learning plan for a goal
    Plan(PlanArgs),

    /// Generate a quiz from indexed resources
    Quiz(QuizArgs),

    /// Show index status
    Status,
}

#[derive(Args)]
pub struct IngestArgs {
    /// JSON file containing an array of resources
    pub file: PathBuf,

    /// Assign every ingested resource to this tenant
    #[arg(long)]
    pub tenant: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: Vec<String>,

    /// Number of candidates from the first-pass retrieval
    #[arg(short = 'n', long)]
    pub top_k: Option<usize>,

    /// Number of results kept after reranking
    #[arg(long)]
    pub top: Option<usize>,

    /// Skip the rerank pass
    #[arg(long)]
    pub no_rerank: bool,

    /// Restrict to a tenant (global resources are always included)
    #[arg(short, long)]
    pub tenant: Option<String>,

    /// Maximum difficulty level
    #[arg(long, value_enum)]
    pub level: Option<Level>,

    /// Maximum resource duration in minutes
    #[arg(long)]
    pub max_duration: Option<u32>,

    /// Filter by media type
    #[arg(long)]
    pub media_type: Option<String>,

    /// Filter by provider
    #[arg(long)]
    pub provider: Option<String>,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Learning goal
    pub goal: Vec<String>,

    /// Skills already held
    #[arg(long, value_delimiter = ',')]
    pub skills: Vec<String>,

    /// Total time budget in hours
    #[arg(long, default_value = "20")]
    pub budget: u32,

    /// Hours available per week
    #[arg(long, default_value = "5")]
    pub per_week: u32,

    /// Free-text preferences passed to the model
    #[arg(long)]
    pub preferences: Option<String>,

    /// Restrict candidate resources to a tenant
    #[arg(short, long)]
    pub tenant: Option<String>,
}

#[derive(Args)]
pub struct QuizArgs {
    /// Resource ids to draw questions from
    #[arg(required = true)]
    pub resources: Vec<String>,

    /// Number of questions
    #[arg(short = 'n', long, default_value = "5")]
    pub questions: usize,

    /// Difficulty hint (easy, medium, hard)
    #[arg(long)]
    pub difficulty: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn ordinal(self) -> u8 {
        match self {
            Level::Beginner => learnpath_core::level::BEGINNER,
            Level::Intermediate => learnpath_core::level::INTERMEDIATE,
            Level::Advanced => learnpath_core::level::ADVANCED,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
