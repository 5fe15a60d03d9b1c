//! Resource ingestion
//!
//! Embeds resources with the passage instruction and upserts them into
//! the vector index. Upserts are keyed by URL, so re-running ingestion
//! over the same material is idempotent.

use crate::error::{LearnPathError, Result};
use crate::index::VectorIndex;
use crate::llm::{Embedder, Instruction};
use crate::resource::Resource;

/// Ingest a batch of resources. Returns the number upserted.
///
/// One batched embedding call covers the whole slice; per-item calls
/// would multiply request overhead and rate-limit pressure.
pub async fn ingest_resources(
    index: &VectorIndex,
    embedder: &dyn Embedder,
    resources: &[Resource],
) -> Result<usize> {
    if resources.is_empty() {
        return Ok(0);
    }

    index.register_model(embedder.model_name(), embedder.dimensions())?;

    let texts: Vec<String> = resources.iter().map(|r| r.embedding_text()).collect();
    let embeddings = embedder.embed_batch(&texts, Instruction::Passage).await?;

    if embeddings.len() != resources.len() {
        return Err(LearnPathError::External(format!(
            "embedder returned {} vectors for {} resources",
            embeddings.len(),
            resources.len()
        )));
    }

    for (resource, embedding) in resources.iter().zip(embeddings.iter()) {
        index.upsert(resource, embedding)?;
    }

    tracing::info!(count = resources.len(), "resources ingested");

    Ok(resources.len())
}
