//! Learnpath Core Library
//!
//! Retrieval-augmented learning-path generation:
//! - SQLite-backed vector index with tenant-isolated filtered search
//! - Two-phase retrieval: vector search, then cross-encoder reranking
//! - Dual inference backends (remote HTTP API or in-process models)
//! - Structured LLM output with schema validation and corrective retries

pub mod config;
pub mod error;
pub mod filter;
pub mod generate;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod resource;

pub use config::{Config, GenerationConfig, InferenceBackend, InferenceConfig, SearchConfig};
pub use error::{Error, LearnPathError, Result};
pub use filter::{build_predicate, QueryFilter};
pub use generate::{
    LearningPlan, Milestone, PlanGenerator, PlanRequest, PlanResource, Quiz, QuizGenerator,
    QuizOption, QuizQuestion, ResourceSnippet,
};
pub use index::{Field, IndexStats, ModelInfo, Predicate, VectorIndex};
pub use ingest::ingest_resources;
pub use llm::{
    build_embedder, build_reranker, embed_texts, ChatMessage, ChatModel, Embedder,
    EmbeddingBatch, HttpEmbedder, HttpReranker, InferenceClient, Instruction, LocalEmbedder,
    LocalReranker, Reranker, StructuredClient,
};
pub use pipeline::{rerank_candidates, run_search, SearchRequest, SearchResponse};
pub use resource::{level, Candidate, Resource, GLOBAL_TENANT};

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "learnpath";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "learnpath";
