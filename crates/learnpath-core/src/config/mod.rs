//! Configuration management

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Inference backends (embedding, reranking, chat)
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// Plan/quiz generation settings
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Which inference backend serves embeddings and reranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InferenceBackend {
    /// External HTTP inference API; requires an API key
    Remote,
    /// In-process model, loaded lazily on first use
    #[default]
    Local,
}

/// Inference service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Backend selection, evaluated once at startup
    #[serde(default)]
    pub backend: InferenceBackend,

    /// Base URL of the remote inference service
    #[serde(default = "default_inference_url")]
    pub base_url: String,

    /// API key for the remote service (required when backend = remote)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Embedding model served by the remote backend
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Reranker model served by the remote backend
    #[serde(default = "default_reranker_model")]
    pub reranker_model: String,

    /// Chat-completion model for plan and quiz generation
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Base URL for chat completions (falls back to base_url)
    #[serde(default)]
    pub chat_url: Option<String>,

    /// API key for the chat service (falls back to api_key)
    #[serde(default)]
    pub chat_api_key: Option<String>,

    /// Embedding dimensions (defaults to 768 for e5-base)
    #[serde(default = "default_dimensions")]
    pub embedding_dimensions: usize,

    /// Request timeout in seconds for every outbound inference call
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Use quantized local model variants to shrink memory footprint
    #[serde(default = "default_quantize")]
    pub quantize: bool,
}

impl InferenceConfig {
    /// Get the chat-completions URL (falls back to the inference URL)
    pub fn chat_url(&self) -> &str {
        self.chat_url.as_deref().unwrap_or(&self.base_url)
    }

    /// Get the chat API key (falls back to the inference key)
    pub fn chat_api_key(&self) -> Option<&str> {
        self.chat_api_key.as_deref().or(self.api_key.as_deref())
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: match std::env::var("LEARNPATH_INFERENCE_BACKEND").as_deref() {
                Ok("remote") => InferenceBackend::Remote,
                _ => InferenceBackend::Local,
            },
            base_url: std::env::var("LEARNPATH_INFERENCE_URL")
                .unwrap_or_else(|_| default_inference_url()),
            api_key: std::env::var("LEARNPATH_INFERENCE_API_KEY").ok(),
            embedding_model: std::env::var("LEARNPATH_EMBEDDING_MODEL")
                .unwrap_or_else(|_| default_embedding_model()),
            reranker_model: std::env::var("LEARNPATH_RERANKER_MODEL")
                .unwrap_or_else(|_| default_reranker_model()),
            chat_model: std::env::var("LEARNPATH_CHAT_MODEL")
                .unwrap_or_else(|_| default_chat_model()),
            chat_url: std::env::var("LEARNPATH_CHAT_URL").ok(),
            chat_api_key: std::env::var("LEARNPATH_CHAT_API_KEY").ok(),
            embedding_dimensions: std::env::var("LEARNPATH_EMBEDDING_DIMS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_dimensions),
            timeout_secs: default_timeout(),
            quantize: default_quantize(),
        }
    }
}

/// Search defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Candidates fetched by the first-pass vector search
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Candidates kept after reranking
    #[serde(default = "default_rerank_top_n")]
    pub rerank_top_n: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            rerank_top_n: default_rerank_top_n(),
        }
    }
}

/// Generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Total model calls the structured-output client may make per request
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_inference_url() -> String {
    "https://api.deepinfra.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "intfloat/e5-base-v2".to_string()
}

fn default_reranker_model() -> String {
    "BAAI/bge-reranker-base".to_string()
}

fn default_chat_model() -> String {
    "anthropic/claude-3.5-sonnet".to_string()
}

fn default_dimensions() -> usize {
    768
}

fn default_timeout() -> u64 {
    30
}

fn default_quantize() -> bool {
    true
}

fn default_top_k() -> usize {
    20
}

fn default_rerank_top_n() -> usize {
    5
}

fn default_max_retries() -> usize {
    3
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4000
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parses_from_yaml() {
        let yaml = "inference:\n  backend: remote\n  api_key: secret\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.inference.backend, InferenceBackend::Remote);
        assert_eq!(config.inference.api_key.as_deref(), Some("secret"));
        // Untouched sections keep defaults
        assert_eq!(config.search.top_k, 20);
        assert_eq!(config.generation.max_retries, 3);
    }

    #[test]
    fn test_chat_url_falls_back_to_base_url() {
        let config = InferenceConfig {
            chat_url: None,
            ..Default::default()
        };
        assert_eq!(config.chat_url(), config.base_url);
    }
}
