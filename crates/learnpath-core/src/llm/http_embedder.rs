//! HTTP-based embedder using the remote inference service

use super::{Embedder, InferenceClient, Instruction};
use crate::config::InferenceConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Embedder backed by the remote inference API
pub struct HttpEmbedder {
    client: Arc<InferenceClient>,
}

impl HttpEmbedder {
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
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str, instruction: Instruction) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()], instruction).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| crate::error::LearnPathError::External("no embedding returned".into()))
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        instruction: Instruction,
    ) -> Result<Vec<Vec<f32>>> {
        let prefixed: Vec<String> = texts.iter().map(|t| instruction.apply(t)).collect();
        self.client.embed_raw(&prefixed).await
    }

    fn dimensions(&self) -> usize {
        self.client.config().embedding_dimensions
    }

    fn model_name(&self) -> &str {
        &self.client.config().embedding_model
    }
}
