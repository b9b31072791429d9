//! Response documents of the `/api/chat` endpoint.
//!
//! Streamed records often carry only `message` and `done`, so every field
//! decodes to a default when missing. Fields the adapter never reads
//! (`model`, `created_at`, `total_tokens`) are kept for API contract completeness.

use serde::Deserialize;

use crate::core::{FinishReason, LlmError, ProviderResponse, TokenUsage};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub message: ResponseMessage,

    #[serde(default)]
    pub done: bool,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub usage: Option<Usage>,

    /// Native Ollama input token count, used when `usage` is absent.
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,

    /// Native Ollama output token count, used when `usage` is absent.
    #[serde(default)]
    pub eval_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,

    #[serde(default)]
    pub completion_tokens: u64,

    #[serde(default)]
    pub total_tokens: u64,
}

impl ChatResponse {
    /// The backend-reported error, if any. An empty string means no error.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    pub fn token_usage(&self) -> TokenUsage {
        match self.usage {
            Some(usage) => TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
            None => TokenUsage {
                input_tokens: self.prompt_eval_count.unwrap_or_default(),
                output_tokens: self.eval_count.unwrap_or_default(),
            },
        }
    }

    /// Normalizes a buffered (non-streaming) response.
    pub fn into_provider_response(self) -> Result<ProviderResponse, LlmError> {
        if let Some(error) = self.error_message() {
            return Err(LlmError::Api {
                message: error.to_string(),
                status_code: None,
            });
        }

        let usage = self.token_usage();
        Ok(ProviderResponse {
            content: self.message.content,
            usage,
            finish_reason: FinishReason::EndTurn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document_normalizes() {
        let response: ChatResponse = serde_json::from_str(
            r#"{
                "model": "llama3",
                "created_at": "2024-05-01T10:00:00Z",
                "message": {"role": "assistant", "content": "hello"},
                "done": true,
                "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
            }"#,
        )
        .unwrap();

        let normalized = response.into_provider_response().unwrap();
        assert_eq!(normalized.content, "hello");
        assert_eq!(
            normalized.usage,
            TokenUsage {
                input_tokens: 3,
                output_tokens: 1
            }
        );
        assert_eq!(normalized.finish_reason, FinishReason::EndTurn);
    }

    #[test]
    fn test_sparse_stream_record_decodes() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"message":{"content":"1"},"done":false}"#).unwrap();

        assert_eq!(response.message.content, "1");
        assert!(!response.done);
        assert!(response.error_message().is_none());
        assert_eq!(response.token_usage(), TokenUsage::default());
    }

    #[test]
    fn test_error_field_always_fails() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"message":{"content":"partial"},"done":true,"error":"out of memory"}"#,
        )
        .unwrap();

        match response.into_provider_response() {
            Err(LlmError::Api {
                message,
                status_code: None,
            }) => assert_eq!(message, "out of memory"),
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_error_is_not_an_error() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"message":{"content":"ok"},"done":true,"error":""}"#)
                .unwrap();

        assert!(response.into_provider_response().is_ok());
    }

    #[test]
    fn test_native_eval_counts_fill_missing_usage() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"message":{"content":""},"done":true,"prompt_eval_count":26,"eval_count":290}"#,
        )
        .unwrap();

        assert_eq!(
            response.token_usage(),
            TokenUsage {
                input_tokens: 26,
                output_tokens: 290
            }
        );
    }
}
