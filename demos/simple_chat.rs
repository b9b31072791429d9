/// Single buffered chat call against a local Ollama server.
///
/// Set `OLLAMA_BASE_URL` / `OLLAMA_MODEL` (or put them in `.env`) to point at
/// another server or model.
///
/// Run with: cargo run --example simple-chat
use dotenv::dotenv;
use ollama_link::{LlmProvider, Message, ModelId, OllamaClient, OllamaConfig, OllamaOverrides};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = OllamaConfig::for_model(ModelId::Llama3.model(), OllamaOverrides::from_env())?
        .with_system_message("You are a concise assistant.")
        .with_debug(std::env::var("OLLAMA_DEBUG").is_ok());
    let client = OllamaClient::new(config)?;

    let messages = vec![Message::user("Explain what a context window is in two sentences.")];
    let response = client
        .send(&messages, &[], &CancellationToken::new())
        .await?;

    println!("{}", response.content);
    println!(
        "\n[input tokens: {}, output tokens: {}, finish: {:?}]",
        response.usage.input_tokens, response.usage.output_tokens, response.finish_reason
    );

    Ok(())
}
