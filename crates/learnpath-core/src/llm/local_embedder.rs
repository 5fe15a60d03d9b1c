//! In-process embedder backed by fastembed ONNX models

use super::{Embedder, Instruction};
use crate::error::{LearnPathError, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Mutex;
use tokio::sync::OnceCell;

/// Dimensions of the local sentence-transformer
const LOCAL_EMBED_DIM: usize = 384;

/// Embedder running a sentence-transformer in process.
///
/// The model is loaded on first use, not at construction, so startup stays
/// fast; concurrent first calls initialize it at most once. The quantize
/// flag selects the int8 model variant to shrink the memory footprint.
pub struct LocalEmbedder {
    model: OnceCell<Mutex<TextEmbedding>>,
    model_name: String,
    quantize: bool,
}

impl LocalEmbedder {
    pub fn new(quantize: bool) -> Self {
        let model_name = if quantize {
            "BAAI/bge-small-en-v1.5 (int8)"
        } else {
            "BAAI/bge-small-en-v1.5"
        };
        Self {
            model: OnceCell::new(),
            model_name: model_name.to_string(),
            quantize,
        }
    }

    async fn model(&self) -> Result<&Mutex<TextEmbedding>> {
        self.model
            .get_or_try_init(|| async {
                let which = if self.quantize {
                    EmbeddingModel::BGESmallENV15Q
                } else {
                    EmbeddingModel::BGESmallENV15
                };
                tracing::info!(model = %self.model_name, "loading local embedding model");
                let model = TextEmbedding::try_new(
                    InitOptions::new(which).with_show_download_progress(false),
                )
                .map_err(|e| {
                    LearnPathError::ModelNotFound(format!(
                        "failed to load embedding model {}: {}",
                        self.model_name, e
                    ))
                })?;
                tracing::info!(model = %self.model_name, "embedding model loaded");
                Ok(Mutex::new(model))
            })
            .await
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, text: &str, instruction: Instruction) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()], instruction).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| LearnPathError::Model("no embedding produced".to_string()))
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        instruction: Instruction,
    ) -> Result<Vec<Vec<f32>>> {
        let prefixed: Vec<String> = texts.iter().map(|t| instruction.apply(t)).collect();

        let model = self.model().await?;
        let mut guard = model
            .lock()
            .map_err(|_| LearnPathError::Model("embedding model lock poisoned".to_string()))?;

        guard
            .embed(prefixed, None)
            .map_err(|e| LearnPathError::Model(format!("embedding inference failed: {}", e)))
    }

    fn dimensions(&self) -> usize {
        LOCAL_EMBED_DIM
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
