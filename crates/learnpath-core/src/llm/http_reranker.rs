//! HTTP-based reranker using the remote inference service

use super::{InferenceClient, Reranker};
use crate::config::InferenceConfig;
use crate::error::{LearnPathError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Reranker backed by the remote inference API
pub struct HttpReranker {
    client: Arc<InferenceClient>,
}

impl HttpReranker {
    /// Create from a shared client
    pub fn new(client: Arc<InferenceClient>) -> Self {
        Self { client }
    }

    /// Create from configuration
    pub fn from_config(config: InferenceConfig) -> Result<Self> {
        let client = InferenceClient::new(config)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl Reranker for HttpReranker {
    async fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f64>> {
        if documents.is_empty() {
            return Ok(vec![]);
        }

        let scores = self.client.rerank_raw(query, documents).await?;

        if scores.len() != documents.len() {
            return Err(LearnPathError::External(format!(
                "rerank service returned {} scores for {} documents",
                scores.len(),
                documents.len()
            )));
        }

        Ok(scores)
    }

    fn model_name(&self) -> &str {
        &self.client.config().reranker_model
    }
}
