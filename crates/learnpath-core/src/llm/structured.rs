//! Structured-output client: validation and retry loop
//!
//! Treats the chat model as an unreliable producer of structured data.
//! Each attempt sends the full conversation; a malformed answer and a
//! corrective instruction carrying the specific error are appended before
//! the next attempt. Transport failures propagate immediately and are
//! never retried here; only validation failures are.

use super::{extract_json, ChatMessage, ChatModel};
use crate::error::{LearnPathError, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Default total model calls per generate() invocation
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Client coercing free-text model output into schema-valid structures
pub struct StructuredClient {
    chat: Arc<dyn ChatModel>,
    max_retries: usize,
}

impl StructuredClient {
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        Self {
            chat,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Cap the total number of model calls (minimum 1)
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn model_name(&self) -> &str {
        self.chat.model_name()
    }

    /// Generate a `T` from the model, retrying with corrective feedback.
    ///
    /// Validation is serde deserialization into `T`: required fields,
    /// types, and nested lists are all checked, and the serde error
    /// message names the specific violation fed back to the model.
    pub async fn generate<T: DeserializeOwned>(&self, system: &str, prompt: &str) -> Result<T> {
        let mut conversation = vec![ChatMessage::system(system), ChatMessage::user(prompt)];
        let mut last_error = String::new();

        for attempt in 1..=self.max_retries {
            let raw = self.chat.chat_completion(conversation.clone()).await?;
            let json_text = extract_json(&raw)?;

            match serde_json::from_str::<T>(&json_text) {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "model output validated after correction");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    last_error = e.to_string();
                    tracing::warn!(attempt, error = %last_error, "model output failed validation");

                    conversation.push(ChatMessage::assistant(raw));
                    conversation.push(ChatMessage::user(format!(
                        "Your previous response was not valid: {}. \
                         Respond again with ONLY a JSON object matching the requested \
                         schema, correcting this error.",
                        last_error
                    )));
                }
            }
        }

        Err(LearnPathError::Validation(format!(
            "model output still invalid after {} attempts: {}",
            self.max_retries, last_error
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Deserialize)]
    struct Answer {
        citation: String,
    }

    /// Chat model replaying a fixed script of responses
    struct ScriptedChat {
        responses: Mutex<Vec<String>>,
        calls: AtomicUsize,
        last_conversation_len: AtomicUsize,
    }

    impl ScriptedChat {
        fn new(responses: Vec<&str>) -> Self {
            let mut responses: Vec<String> =
                responses.into_iter().map(|s| s.to_string()).collect();
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
                last_conversation_len: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedChat {
        async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_conversation_len
                .store(messages.len(), Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            responses
                .pop()
                .ok_or_else(|| LearnPathError::External("script exhausted".to_string()))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_valid_first_attempt_makes_one_call() {
        let chat = Arc::new(ScriptedChat::new(vec![r#"{"citation": "p. 12"}"#]));
        let client = StructuredClient::new(chat.clone());

        let answer: Answer = client.generate("system", "prompt").await.unwrap();
        assert_eq!(answer.citation, "p. 12");
        assert_eq!(chat.calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_converges_on_second_attempt() {
        // First response omits the required field, second supplies it
        let chat = Arc::new(ScriptedChat::new(vec![
            r#"{"note": "oops"}"#,
            r#"{"citation": "section 3.1"}"#,
        ]));
        let client = StructuredClient::new(chat.clone());

        let answer: Answer = client.generate("system", "prompt").await.unwrap();
        assert_eq!(answer.citation, "section 3.1");
        assert_eq!(chat.calls(), 2);
        // system + user + assistant (bad) + corrective user
        assert_eq!(chat.last_conversation_len.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_always_malformed_terminates_with_validation_error() {
        let chat = Arc::new(ScriptedChat::new(vec![
            "not json at all",
            "still not json",
            "nope",
            "never called",
        ]));
        let client = StructuredClient::new(chat.clone());

        let result: Result<Answer> = client.generate("system", "prompt").await;
        let err = result.unwrap_err();
        assert!(matches!(err, LearnPathError::Validation(_)));
        assert_eq!(chat.calls(), DEFAULT_MAX_RETRIES);
    }

    #[tokio::test]
    async fn test_terminal_error_carries_last_validation_failure() {
        let chat = Arc::new(ScriptedChat::new(vec![r#"{"wrong": 1}"#]));
        let client = StructuredClient::new(chat).with_max_retries(1);

        let result: Result<Answer> = client.generate("system", "prompt").await;
        let message = result.unwrap_err().to_string();
        assert!(message.contains("citation"), "got: {}", message);
    }

    #[tokio::test]
    async fn test_transport_error_propagates_without_retry() {
        struct FailingChat;

        #[async_trait]
        impl ChatModel for FailingChat {
            async fn chat_completion(&self, _messages: Vec<ChatMessage>) -> Result<String> {
                Err(LearnPathError::Timeout("chat service".to_string()))
            }

            fn model_name(&self) -> &str {
                "failing"
            }
        }

        let client = StructuredClient::new(Arc::new(FailingChat));
        let result: Result<Answer> = client.generate("system", "prompt").await;
        assert!(matches!(result.unwrap_err(), LearnPathError::Timeout(_)));
    }
}
