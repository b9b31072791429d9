/// Streams a chat completion and prints content as it arrives.
///
/// Press Ctrl-C to cancel the call mid-stream.
///
/// Run with: cargo run --example stream-chat
use std::io::{self, Write};

use dotenv::dotenv;
use futures::StreamExt;
use ollama_link::{
    LlmProvider, Message, ModelId, OllamaClient, OllamaConfig, OllamaOverrides, ProviderEvent,
    ToolCall, ToolCallResult,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = OllamaConfig::for_model(ModelId::Llama3.model(), OllamaOverrides::from_env())?
        .with_system_message("You are a helpful assistant.");
    let client = OllamaClient::new(config)?;

    // Tool calls from an earlier turn reach the model as plain text.
    let messages = vec![
        Message::user("What's the weather in Lisbon?"),
        Message::assistant("").with_tool_calls(vec![ToolCall {
            id: "call_weather".to_string(),
            name: "get_weather".to_string(),
            arguments: json!({ "city": "Lisbon" }),
        }]),
        Message::tool_results(vec![ToolCallResult {
            tool_call_id: "call_weather".to_string(),
            content: "19°C, clear skies".to_string(),
        }]),
        Message::user("Summarize that for a tourist."),
    ];

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut events = client.stream(&messages, &[], &cancel);
    while let Some(event) = events.next().await {
        match event {
            ProviderEvent::ContentDelta(text) => {
                print!("{text}");
                io::stdout().flush()?;
            }
            ProviderEvent::Complete(response) => {
                println!(
                    "\n\n[input tokens: {}, output tokens: {}]",
                    response.usage.input_tokens, response.usage.output_tokens
                );
            }
            ProviderEvent::Error(e) => {
                eprintln!("\nstream failed: {e}");
            }
        }
    }

    Ok(())
}
