//! HTTP client for external inference services
//!
//! One client covers the three remote capabilities: embeddings and
//! reranking on the inference endpoint, chat completions on the chat
//! endpoint (which may be a different host, e.g. an OpenAI-compatible
//! router). The API key is checked at construction; a missing key is a
//! configuration error, not a first-use surprise.

use crate::config::{GenerationConfig, InferenceConfig};
use crate::error::{LearnPathError, Result};
use crate::llm::ChatModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Remote inference client
#[derive(Debug)]
pub struct InferenceClient {
    http_client: reqwest::Client,
    config: InferenceConfig,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl InferenceClient {
    /// Create a new client from configuration.
    ///
    /// Fails fast when the API key is absent so the process never serves
    /// requests against a backend it cannot reach.
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            LearnPathError::Config(
                "an API key is required for remote inference calls \
                 (set LEARNPATH_INFERENCE_API_KEY)"
                    .to_string(),
            )
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(LearnPathError::Http)?;

        tracing::info!(url = %config.base_url, "inference client initialized");

        Ok(Self {
            http_client,
            config,
            api_key,
            temperature: 0.7,
            max_tokens: 4000,
        })
    }

    /// Apply generation settings to chat completions
    pub fn with_generation(mut self, generation: &GenerationConfig) -> Self {
        self.temperature = generation.temperature;
        self.max_tokens = generation.max_tokens;
        self
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Embed texts via the inference endpoint.
    ///
    /// Texts must already carry their query/passage prefix; prefixing is
    /// the embedder wrapper's job.
    pub async fn embed_raw(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            inputs: &'a [String],
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            embeddings: Vec<Vec<f32>>,
        }

        let url = format!(
            "{}/inference/{}",
            self.config.base_url, self.config.embedding_model
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest { inputs: texts })
            .send()
            .await
            .map_err(|e| LearnPathError::from_transport(e, "embedding service"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LearnPathError::External(format!(
                "embedding service error (HTTP {}): {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response.json().await.map_err(LearnPathError::Http)?;
        Ok(embed_response.embeddings)
    }

    /// Score documents against a query via the inference endpoint
    pub async fn rerank_raw(&self, query: &str, documents: &[String]) -> Result<Vec<f64>> {
        #[derive(Serialize)]
        struct RerankRequest<'a> {
            queries: Vec<&'a str>,
            documents: &'a [String],
        }

        #[derive(Deserialize)]
        struct RerankResponse {
            scores: Vec<f64>,
        }

        let url = format!(
            "{}/inference/{}",
            self.config.base_url, self.config.reranker_model
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&RerankRequest {
                queries: vec![query],
                documents,
            })
            .send()
            .await
            .map_err(|e| LearnPathError::from_transport(e, "rerank service"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LearnPathError::External(format!(
                "rerank service error (HTTP {}): {}",
                status, body
            )));
        }

        let rerank_response: RerankResponse =
            response.json().await.map_err(LearnPathError::Http)?;
        Ok(rerank_response.scores)
    }
}

#[async_trait]
impl ChatModel for InferenceClient {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let request = ChatRequest {
            model: self.config.chat_model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.chat_url());
        let api_key = self.config.chat_api_key().unwrap_or(&self.api_key);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LearnPathError::from_transport(e, "chat service"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LearnPathError::External(format!(
                "chat service error (HTTP {}): {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(LearnPathError::Http)?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LearnPathError::External("no choices in chat response".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.config.chat_model
    }
}
