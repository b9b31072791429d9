pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::LlmError;
pub use http::{HttpClient, HttpClientConfig, Inspector, InspectorConfig};
pub use traits::LlmProvider;
pub use types::{
    ChatRole, EventStream, FinishReason, GenerationConfig, Message, ProviderEvent,
    ProviderResponse, TokenUsage, Tool, ToolCall, ToolCallResult,
};
