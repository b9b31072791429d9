use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{
    error::LlmError,
    types::{EventStream, Message, ProviderResponse, Tool},
};

/// A chat-completion backend.
///
/// `cancel` is the call context: cancelling it ends an in-flight call with
/// [`LlmError::Cancelled`], either as the returned error or as the final event.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn send(
        &self,
        messages: &[Message],
        tools: &[Tool],
        cancel: &CancellationToken,
    ) -> Result<ProviderResponse, LlmError>;

    /// Starts a streaming call. Failures are reported as the last event of
    /// the stream, never by this method.
    fn stream(
        &self,
        messages: &[Message],
        tools: &[Tool],
        cancel: &CancellationToken,
    ) -> EventStream;
}
