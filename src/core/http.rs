//! Shared HTTP client for JSON chat endpoints.
//!
//! Every call is single-shot: failures are returned to the caller as-is and
//! retry policy is left to higher layers.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::LlmError;

/// Callback receiving a raw JSON payload verbatim.
pub type Inspector = Arc<dyn Fn(&str) + Send + Sync>;

/// Debug hooks for outbound requests and buffered responses.
///
/// Hooks only run when the owning client has debugging enabled.
#[derive(Clone, Default)]
pub struct InspectorConfig {
    pub request_inspector: Option<Inspector>,
    pub response_inspector: Option<Inspector>,
}

impl InspectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_request(mut self, inspector: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.request_inspector = Some(Arc::new(inspector));
        self
    }

    pub fn on_response(mut self, inspector: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.response_inspector = Some(Arc::new(inspector));
        self
    }
}

impl fmt::Debug for InspectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectorConfig")
            .field("request_inspector", &self.request_inspector.is_some())
            .field("response_inspector", &self.response_inspector.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Deadline for a whole call, including reading a streamed body.
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    debug: bool,
    inspector_config: InspectorConfig,
}

impl HttpClient {
    pub fn new(
        config: &HttpClientConfig,
        debug: bool,
        inspector_config: Option<InspectorConfig>,
    ) -> Result<Self, LlmError> {
        let default_ua = format!("ollama-link/{}", env!("CARGO_PKG_VERSION"));
        let ua = config.user_agent.as_deref().unwrap_or(&default_ua);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(ua)
            .build()
            .map_err(|e| {
                LlmError::ProviderConfiguration(format!("Failed to build reqwest client: {e}"))
            })?;

        Ok(Self {
            client,
            debug,
            inspector_config: inspector_config.unwrap_or_default(),
        })
    }

    /// POST a JSON body and decode one JSON document from the buffered reply.
    #[tracing::instrument(
        name = "http_post_json",
        skip(self, body, cancel),
        fields(url = %url),
        err
    )]
    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        body: &Req,
        cancel: &CancellationToken,
    ) -> Result<Res, LlmError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let payload = self.encode(body)?;

        let exchange = async {
            let res = self.dispatch(url, payload).await?;
            let status = res.status();

            let response_text = res.text().await.map_err(|e| LlmError::Network {
                message: "Failed to read response body".to_string(),
                source: Box::new(e),
            })?;

            if !status.is_success() {
                warn!(status = %status, "API returned error status");
                return Err(LlmError::Api {
                    message: response_text,
                    status_code: Some(status.as_u16()),
                });
            }

            debug!(status = %status, "HTTP request successful");
            self.inspect_response(&response_text);

            serde_json::from_str(&response_text).map_err(|e| LlmError::Parse {
                message: "Failed to parse API response".to_string(),
                source: Box::new(e),
            })
        };

        until_cancelled(cancel, exchange).await
    }

    /// POST a JSON body and hand back the live response for incremental reading.
    ///
    /// A non-success status drains the body into an [`LlmError::Api`].
    #[tracing::instrument(
        name = "http_post_json_stream",
        skip(self, body, cancel),
        fields(url = %url),
        err
    )]
    pub async fn post_json_stream<Req>(
        &self,
        url: &str,
        body: &Req,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, LlmError>
    where
        Req: Serialize,
    {
        let payload = self.encode(body)?;

        let exchange = async {
            let res = self.dispatch(url, payload).await?;
            let status = res.status();

            if status.is_success() {
                debug!(status = %status, "Streaming response opened");
                return Ok(res);
            }

            warn!(status = %status, "API returned error status");
            let error_text = res.text().await.map_err(|e| LlmError::Network {
                message: "Failed to read error response body".to_string(),
                source: Box::new(e),
            })?;
            Err(LlmError::Api {
                message: error_text,
                status_code: Some(status.as_u16()),
            })
        };

        until_cancelled(cancel, exchange).await
    }

    fn encode<Req: Serialize>(&self, body: &Req) -> Result<String, LlmError> {
        let payload = serde_json::to_string(body).map_err(|e| LlmError::Serialization {
            message: "Failed to serialize request".to_string(),
            source: e,
        })?;

        if self.debug {
            debug!(request = %payload, "Outbound request");
            if let Some(ref inspector) = self.inspector_config.request_inspector {
                inspector(&payload);
            }
        }

        Ok(payload)
    }

    fn inspect_response(&self, body: &str) {
        if !self.debug {
            return;
        }

        debug!(response = %body, "Inbound response");
        if let Some(ref inspector) = self.inspector_config.response_inspector {
            inspector(body);
        }
    }

    async fn dispatch(&self, url: &str, payload: String) -> Result<reqwest::Response, LlmError> {
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                message: "Failed to send request".to_string(),
                source: Box::new(e),
            })
    }
}

async fn until_cancelled<T, F>(cancel: &CancellationToken, exchange: F) -> Result<T, LlmError>
where
    F: Future<Output = Result<T, LlmError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LlmError::Cancelled),
        result = exchange => result,
    }
}
