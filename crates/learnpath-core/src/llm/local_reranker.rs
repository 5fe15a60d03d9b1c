//! In-process cross-encoder reranker backed by fastembed

use super::Reranker;
use crate::error::{LearnPathError, Result};
use async_trait::async_trait;
use fastembed::{RerankInitOptions, RerankerModel, TextRerank};
use std::sync::Mutex;
use tokio::sync::OnceCell;

const LOCAL_RERANKER_NAME: &str = "BAAI/bge-reranker-base";

/// Reranker running a cross-encoder in process.
///
/// Mirrors [`super::LocalEmbedder`]: lazy at-most-once load on first use.
pub struct LocalReranker {
    model: OnceCell<Mutex<TextRerank>>,
}

impl LocalReranker {
    pub fn new() -> Self {
        Self {
            model: OnceCell::new(),
        }
    }

    async fn model(&self) -> Result<&Mutex<TextRerank>> {
        self.model
            .get_or_try_init(|| async {
                tracing::info!(model = LOCAL_RERANKER_NAME, "loading local reranker model");
                let model = TextRerank::try_new(
                    RerankInitOptions::new(RerankerModel::BGERerankerBase)
                        .with_show_download_progress(false),
                )
                .map_err(|e| {
                    LearnPathError::ModelNotFound(format!(
                        "failed to load reranker model {}: {}",
                        LOCAL_RERANKER_NAME, e
                    ))
                })?;
                tracing::info!(model = LOCAL_RERANKER_NAME, "reranker model loaded");
                Ok(Mutex::new(model))
            })
            .await
    }
}

impl Default for LocalReranker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Reranker for LocalReranker {
    async fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f64>> {
        if documents.is_empty() {
            return Ok(vec![]);
        }

        let model = self.model().await?;
        let mut guard = model
            .lock()
            .map_err(|_| LearnPathError::Model("reranker model lock poisoned".to_string()))?;

        let docs: Vec<&str> = documents.iter().map(|d| d.as_str()).collect();
        let results = guard
            .rerank(query, docs, false, None)
            .map_err(|e| LearnPathError::Model(format!("rerank inference failed: {}", e)))?;

        // fastembed returns results sorted by score; restore input order
        let mut scores = vec![0.0f64; documents.len()];
        for result in results {
            scores[result.index] = f64::from(result.score);
        }

        Ok(scores)
    }

    fn model_name(&self) -> &str {
        LOCAL_RERANKER_NAME
    }
}
