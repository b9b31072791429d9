//! # ollama-link
//!
//! Provider-agnostic chat completions against a local [Ollama](https://ollama.com) server.
//!
//! Conversations are translated into the `/api/chat` wire format and sent
//! either as a single buffered call or as a stream of [`ProviderEvent`]s.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use ollama_link::{
//!     LlmProvider, Message, ModelId, OllamaClient, OllamaConfig, OllamaOverrides, ProviderEvent,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OllamaConfig::for_model(ModelId::Llama3.model(), OllamaOverrides::from_env())?
//!         .with_system_message("You are a helpful assistant.");
//!     let client = OllamaClient::new(config)?;
//!
//!     let messages = vec![Message::user("Why is the sky blue?")];
//!     let mut events = client.stream(&messages, &[], &CancellationToken::new());
//!
//!     while let Some(event) = events.next().await {
//!         match event {
//!             ProviderEvent::ContentDelta(text) => print!("{text}"),
//!             ProviderEvent::Complete(response) => println!("\n{:?}", response.usage),
//!             ProviderEvent::Error(e) => return Err(e.into()),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Tool calls
//!
//! Ollama's chat endpoint has no tool-call representation. Tool calls and tool
//! results in the history are degraded to plain text turns, so the model sees
//! what was requested and returned, but cannot issue structured calls itself.

pub mod chat;
pub mod core;
pub mod provider;

pub use crate::core::{
    ChatRole, EventStream, FinishReason, GenerationConfig, HttpClientConfig, InspectorConfig,
    LlmError, LlmProvider, Message, ProviderEvent, ProviderResponse, TokenUsage, Tool, ToolCall,
    ToolCallResult,
};
pub use provider::{Model, ModelId, OllamaClient, OllamaConfig, OllamaOverrides, Provider};
