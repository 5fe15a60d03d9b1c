//! Inference trait definitions

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a text in the asymmetric embedding space.
///
/// Queries and passages are embedded with different prefixes so a query
/// vector is only ever compared against passage vectors. The prefix is
/// part of the embedding contract, not a backend detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instruction {
    Query,
    Passage,
}

impl Instruction {
    /// Fixed textual prefix prepended before encoding
    pub fn prefix(&self) -> &'static str {
        match self {
            Instruction::Query => "query: ",
            Instruction::Passage => "passage: ",
        }
    }

    /// Apply the prefix to a text
    pub fn apply(&self, text: &str) -> String {
        format!("{}{}", self.prefix(), text)
    }
}

/// Embedding generation trait
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str, instruction: Instruction) -> Result<Vec<f32>>;

    /// Generate embeddings for a batch of texts
    async fn embed_batch(
        &self,
        texts: &[String],
        instruction: Instruction,
    ) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Pairwise (query, document) relevance scoring trait
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Score each document against the query, one batched call.
    ///
    /// Returns one score per document, in input order. Scores are ordinal
    /// only: comparable within one call, not across calls or models.
    async fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f64>>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Chat-completion trait for text-generation backends
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a completion for the conversation
    async fn chat_completion(&self, messages: Vec<super::ChatMessage>) -> Result<String>;

    /// Get model name
    fn model_name(&self) -> &str;
}
