//! First-pass retrieval: embed the query, run a filtered vector search

use crate::error::Result;
use crate::filter::{build_predicate, QueryFilter};
use crate::index::VectorIndex;
use crate::llm::{Embedder, Instruction};
use crate::resource::Candidate;

impl VectorIndex {
    /// Retrieve up to `top_k` candidates for a query.
    ///
    /// The query is embedded with the query instruction so it lands on the
    /// query side of the asymmetric space; stored vectors are passages.
    /// Candidates come back ordered by descending raw similarity, exactly
    /// as the index scored them. Embedding or index failures propagate;
    /// retries belong to the transport layer, not here.
    pub async fn search(
        &self,
        query: &str,
        embedder: &dyn Embedder,
        filter: Option<&QueryFilter>,
        top_k: usize,
    ) -> Result<Vec<Candidate>> {
        let query_vector = embedder.embed(query, Instruction::Query).await?;
        let predicate = build_predicate(filter);

        let candidates = self.query(&query_vector, &predicate, top_k)?;

        tracing::debug!(
            query,
            top_k,
            found = candidates.len(),
            "vector search complete"
        );

        Ok(candidates)
    }
}
