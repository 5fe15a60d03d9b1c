//! Inference integration
//!
//! Provides traits and implementations for:
//! - Embedding generation (remote inference API or in-process model)
//! - Query/document reranking (same dual-backend split)
//! - Chat completion and the structured-output validation loop

mod client;
mod extract;
mod http_embedder;
mod http_reranker;
mod local_embedder;
mod local_reranker;
mod structured;
mod traits;

pub use client::{ChatMessage, InferenceClient};
pub use extract::extract_json;
pub use http_embedder::HttpEmbedder;
pub use http_reranker::HttpReranker;
pub use local_embedder::LocalEmbedder;
pub use local_reranker::LocalReranker;
pub use structured::{StructuredClient, DEFAULT_MAX_RETRIES};
pub use traits::{ChatModel, Embedder, Instruction, Reranker};

use crate::config::{InferenceBackend, InferenceConfig};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of embedding a batch of texts, at the embedding boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingBatch {
    pub embeddings: Vec<Vec<f32>>,
    pub dimension: usize,
    pub model: String,
}

/// Embed texts with the given instruction, one batched backend call
pub async fn embed_texts(
    embedder: &dyn Embedder,
    texts: &[String],
    instruction: Instruction,
) -> Result<EmbeddingBatch> {
    let embeddings = embedder.embed_batch(texts, instruction).await?;
    Ok(EmbeddingBatch {
        embeddings,
        dimension: embedder.dimensions(),
        model: embedder.model_name().to_string(),
    })
}

/// Construct the configured embedder variant.
///
/// Call sites never branch on backend type; they hold the trait object.
pub fn build_embedder(config: &InferenceConfig) -> Result<Arc<dyn Embedder>> {
    match config.backend {
        InferenceBackend::Remote => Ok(Arc::new(HttpEmbedder::from_config(config.clone())?)),
        InferenceBackend::Local => Ok(Arc::new(LocalEmbedder::new(config.quantize))),
    }
}

/// Construct the configured reranker variant
pub fn build_reranker(config: &InferenceConfig) -> Result<Arc<dyn Reranker>> {
    match config.backend {
        InferenceBackend::Remote => Ok(Arc::new(HttpReranker::from_config(config.clone())?)),
        InferenceBackend::Local => Ok(Arc::new(LocalReranker::new())),
    }
}
