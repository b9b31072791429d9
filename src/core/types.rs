use serde_json::{Map, Value};
use std::pin::Pin;

use futures::Stream;

use super::error::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One turn of a provider-agnostic conversation.
///
/// Assistant turns may carry tool calls, tool turns carry the results of
/// earlier calls. Other combinations are ignored by providers.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: ChatRole,
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub tool_results: Vec<ToolCallResult>,
}

impl Message {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn tool_results(results: Vec<ToolCallResult>) -> Self {
        Self {
            tool_results: results,
            ..Self::new(ChatRole::Tool, String::new())
        }
    }

    pub fn with_tool_calls(mut self, calls: Vec<ToolCall>) -> Self {
        self.tool_calls = calls;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Structured input. A `Value::String` holds input that is already serialized.
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub tool_call_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Value,
}

/// Configuration for text generation parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationConfig {
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter (0.0 to 1.0)
    pub top_p: Option<f32>,
}

impl GenerationConfig {
    /// Writes the configured parameters into a backend options object,
    /// replacing keys that are already present.
    pub fn merge_into(&self, options: &mut Map<String, Value>) {
        if let Some(max_tokens) = self.max_tokens {
            options.insert("num_predict".to_string(), Value::from(max_tokens));
        }
        if let Some(temperature) = self.temperature {
            options.insert("temperature".to_string(), Value::from(temperature));
        }
        if let Some(top_p) = self.top_p {
            options.insert("top_p".to_string(), Value::from(top_p));
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Why generation stopped. Ollama reports no finer reason than end of turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FinishReason {
    EndTurn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub finish_reason: FinishReason,
}

/// Events published by a streaming call.
///
/// A well-behaved stream ends with exactly one `Complete` or `Error`.
#[derive(Debug)]
pub enum ProviderEvent {
    ContentDelta(String),
    Complete(ProviderResponse),
    Error(LlmError),
}

impl ProviderEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProviderEvent::ContentDelta(_))
    }
}

pub type EventStream = Pin<Box<dyn Stream<Item = ProviderEvent> + Send>>;
