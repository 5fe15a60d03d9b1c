//! Retrieval & ranking pipeline
//!
//! Two-phase retrieval: a cheap filtered vector search surfaces `top_k`
//! candidates, then an optional cross-encoder rerank re-sorts and keeps
//! the best `rerank_top_n`.

mod rerank;
mod retrieve;

pub use rerank::rerank_candidates;

use crate::error::{LearnPathError, Result};
use crate::filter::QueryFilter;
use crate::index::VectorIndex;
use crate::llm::{Embedder, Reranker};
use crate::resource::Candidate;
use serde::{Deserialize, Serialize};

/// Bounds on caller-supplied limits
pub const MAX_TOP_K: usize = 50;
pub const MAX_RERANK_TOP_N: usize = 20;

/// Search request at the retrieval boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<QueryFilter>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_rerank")]
    pub rerank: bool,
    #[serde(default = "default_rerank_top_n")]
    pub rerank_top_n: usize,
}

fn default_top_k() -> usize {
    20
}

fn default_rerank() -> bool {
    true
}

fn default_rerank_top_n() -> usize {
    5
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: None,
            top_k: default_top_k(),
            rerank: default_rerank(),
            rerank_top_n: default_rerank_top_n(),
        }
    }

    /// Check caller-supplied bounds before running the pipeline
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(LearnPathError::InvalidInput("query is empty".to_string()));
        }
        if self.top_k == 0 || self.top_k > MAX_TOP_K {
            return Err(LearnPathError::InvalidInput(format!(
                "top_k must be between 1 and {}",
                MAX_TOP_K
            )));
        }
        if self.rerank && (self.rerank_top_n == 0 || self.rerank_top_n > MAX_RERANK_TOP_N) {
            return Err(LearnPathError::InvalidInput(format!(
                "rerank_top_n must be between 1 and {}",
                MAX_RERANK_TOP_N
            )));
        }
        Ok(())
    }
}

/// Search response at the retrieval boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Candidate>,
    pub query: String,
    pub total_found: usize,
    pub reranked: bool,
}

/// Run the full pipeline: retrieve, then optionally rerank.
///
/// Zero candidates is a soft outcome: the response carries empty results
/// and callers branch on it, the pipeline never errors for it.
pub async fn run_search(
    index: &VectorIndex,
    embedder: &dyn Embedder,
    reranker: &dyn Reranker,
    request: &SearchRequest,
) -> Result<SearchResponse> {
    request.validate()?;

    let candidates = index
        .search(
            &request.query,
            embedder,
            request.filters.as_ref(),
            request.top_k,
        )
        .await?;

    let (results, reranked) = if request.rerank && !candidates.is_empty() {
        let top_n = request.rerank_top_n.min(candidates.len());
        let (reranked, _scores) =
            rerank_candidates(reranker, &request.query, candidates, top_n).await?;
        (reranked, true)
    } else {
        (candidates, false)
    };

    Ok(SearchResponse {
        total_found: results.len(),
        results,
        query: request.query.clone(),
        reranked,
    })
}
