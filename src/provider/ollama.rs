//! Ollama provider implementation.
//!
//! Ollama has no native tool calling. Tool definitions handed to this client
//! are not sent, and tool calls and results already in the history are
//! rendered as plain text turns by [`convert_messages`].

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::chat::{ChatRequest, ChatResponse, convert_messages, stream::spawn_chat_stream};
use crate::core::{
    EventStream, GenerationConfig, HttpClient, HttpClientConfig, InspectorConfig, LlmError,
    LlmProvider, Message, ProviderResponse, Tool,
};
use crate::provider::constants::ollama;
use crate::provider::models::Model;

/// Ollama-specific configuration for the chat client
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    /// Backend model name, e.g. `llama3`.
    pub model: String,
    pub system_message: Option<String>,
    /// Free-form backend options sent as `options`.
    pub options: Option<Map<String, Value>>,
    /// Typed generation parameters, written over `options`.
    pub generation_config: Option<GenerationConfig>,
    pub http_config: HttpClientConfig,
    /// Log raw payloads and run the inspector hooks.
    pub debug: bool,
    pub inspector: Option<InspectorConfig>,
}

impl OllamaConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: ollama::API_BASE.to_string(),
            model: model.into(),
            system_message: None,
            options: None,
            generation_config: None,
            http_config: HttpClientConfig::default(),
            debug: false,
            inspector: None,
        }
    }

    /// Configuration for a catalog model, with `overrides` applied over the defaults.
    pub fn for_model(model: &Model, overrides: OllamaOverrides) -> Result<Self, LlmError> {
        let api_model = model.resolve_api_model(overrides.model.as_deref())?;
        Ok(Self::new(api_model).apply(OllamaOverrides {
            model: None,
            ..overrides
        }))
    }

    pub fn apply(mut self, overrides: OllamaOverrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = Some(system_message.into());
        self
    }

    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_inspector(mut self, inspector: InspectorConfig) -> Self {
        self.inspector = Some(inspector);
        self
    }

    pub fn chat_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            ollama::CHAT_ENDPOINT
        )
    }

    fn request_options(&self) -> Option<Map<String, Value>> {
        let mut options = self.options.clone().unwrap_or_default();
        if let Some(ref generation) = self.generation_config {
            generation.merge_into(&mut options);
        }

        if options.is_empty() {
            None
        } else {
            Some(options)
        }
    }
}

/// Optional overrides for [`OllamaConfig`]. Unset fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OllamaOverrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl OllamaOverrides {
    /// Overrides from `OLLAMA_BASE_URL` and `OLLAMA_MODEL`, ignoring empty values.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            base_url: var(ollama::BASE_URL_ENV_VAR),
            model: var(ollama::MODEL_ENV_VAR),
        }
    }

    /// Combine two override sets; values set in `later` win.
    pub fn merge(self, later: OllamaOverrides) -> Self {
        Self {
            base_url: later.base_url.or(self.base_url),
            model: later.model.or(self.model),
        }
    }
}

/// Chat client for a local Ollama server.
#[derive(Debug)]
pub struct OllamaClient {
    config: OllamaConfig,
    http: HttpClient,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self, LlmError> {
        let http = HttpClient::new(&config.http_config, config.debug, config.inspector.clone())?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn build_request(&self, messages: &[Message], tools: &[Tool], stream: bool) -> ChatRequest {
        if !tools.is_empty() {
            debug!(
                count = tools.len(),
                "Ollama has no native tool calling, tool definitions are not sent"
            );
        }

        ChatRequest {
            model: self.config.model.clone(),
            messages: convert_messages(self.config.system_message.as_deref(), messages),
            stream,
            options: self.config.request_options(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaClient {
    #[tracing::instrument(
        name = "ollama_send",
        skip(self, messages, tools, cancel),
        fields(model = %self.config.model),
        err
    )]
    async fn send(
        &self,
        messages: &[Message],
        tools: &[Tool],
        cancel: &CancellationToken,
    ) -> Result<ProviderResponse, LlmError> {
        let request = self.build_request(messages, tools, false);
        let response: ChatResponse = self
            .http
            .post_json(&self.config.chat_url(), &request, cancel)
            .await?;

        response
            .into_provider_response()
            .inspect_err(|e| warn!(error = %e, "Ollama reported an error"))
    }

    fn stream(
        &self,
        messages: &[Message],
        tools: &[Tool],
        cancel: &CancellationToken,
    ) -> EventStream {
        let request = self.build_request(messages, tools, true);
        spawn_chat_stream(
            self.http.clone(),
            self.config.chat_url(),
            request,
            cancel.clone(),
        )
    }
}
