//! Streaming decoder for newline-delimited `/api/chat` responses.
//!
//! One background task per call owns the HTTP response body and publishes
//! [`ProviderEvent`]s over a bounded channel. Dropping the task drops the
//! body, so it is released on every exit path.

use std::io;
use std::pin::pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, trace, warn};

use crate::chat::{request::ChatRequest, response::ChatResponse};
use crate::core::{
    EventStream, FinishReason, HttpClient, LlmError, ProviderEvent, ProviderResponse, TokenUsage,
};

/// A slow consumer blocks the reader after one pending event.
const EVENT_CHANNEL_CAPACITY: usize = 1;

/// Events produced by a single decoded record.
#[derive(Debug, Default)]
struct Transition {
    delta: Option<String>,
    terminal: Option<ProviderEvent>,
}

/// Accumulates streamed content until a terminal record arrives.
#[derive(Debug, Default)]
struct StreamAccumulator {
    content: String,
}

impl StreamAccumulator {
    fn apply(&mut self, fragment: ChatResponse) -> Transition {
        if let Some(error) = fragment.error_message() {
            warn!(error = %error, "Backend reported an error mid-stream");
            return Transition {
                delta: None,
                terminal: Some(ProviderEvent::Error(LlmError::Api {
                    message: error.to_string(),
                    status_code: None,
                })),
            };
        }

        let usage = fragment.token_usage();
        let mut transition = Transition::default();

        if !fragment.message.content.is_empty() {
            self.content.push_str(&fragment.message.content);
            transition.delta = Some(fragment.message.content);
        }

        if fragment.done {
            transition.terminal = Some(self.complete(usage));
        }

        transition
    }

    fn complete(&mut self, usage: TokenUsage) -> ProviderEvent {
        ProviderEvent::Complete(ProviderResponse {
            content: std::mem::take(&mut self.content),
            usage,
            finish_reason: FinishReason::EndTurn,
        })
    }
}

/// Sending half of a call's event channel.
struct EventSink {
    tx: mpsc::Sender<ProviderEvent>,
}

impl EventSink {
    /// Returns `false` once the consumer has gone away.
    async fn emit(&self, event: ProviderEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }
}

/// Start a streaming call on a background task and return its event stream.
pub(crate) fn spawn_chat_stream(
    http: HttpClient,
    url: String,
    request: ChatRequest,
    cancel: CancellationToken,
) -> EventStream {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let span = tracing::debug_span!("ollama_stream", model = %request.model);

    tokio::spawn(
        async move {
            let sink = EventSink { tx };

            let response = match http.post_json_stream(&url, &request, &cancel).await {
                Ok(response) => response,
                Err(e) => {
                    sink.emit(ProviderEvent::Error(e)).await;
                    return;
                }
            };

            let body = response.bytes_stream().map(|chunk| chunk.map_err(io::Error::other));
            read_events(body, &sink, &cancel).await;
        }
        .instrument(span),
    );

    Box::pin(ReceiverStream::new(rx))
}

/// Decode a newline-delimited body into events until a terminal event is sent.
async fn read_events<S>(body: S, sink: &EventSink, cancel: &CancellationToken)
where
    S: Stream<Item = io::Result<Bytes>>,
{
    let mut lines = pin!(FramedRead::new(StreamReader::new(body), LinesCodec::new()));
    let mut accumulator = StreamAccumulator::default();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Stream cancelled by caller");
                sink.emit(ProviderEvent::Error(LlmError::Cancelled)).await;
                return;
            }
            _ = sink.tx.closed() => {
                debug!("Consumer dropped the event stream");
                return;
            }
            next = lines.next() => next,
        };

        let line = match next {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                sink.emit(ProviderEvent::Error(read_error(e))).await;
                return;
            }
            None => {
                // The backend closed the body without a `done` record.
                debug!("Stream ended without a terminal record");
                let complete = accumulator.complete(TokenUsage::default());
                sink.emit(complete).await;
                return;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        trace!(record = %line, "Stream record");

        let fragment: ChatResponse = match serde_json::from_str(&line) {
            Ok(fragment) => fragment,
            Err(e) => {
                sink.emit(ProviderEvent::Error(LlmError::Parse {
                    message: "Failed to decode stream record".to_string(),
                    source: Box::new(e),
                }))
                .await;
                return;
            }
        };

        let transition = accumulator.apply(fragment);

        if let Some(delta) = transition.delta {
            if !sink.emit(ProviderEvent::ContentDelta(delta)).await {
                return;
            }
        }

        if let Some(terminal) = transition.terminal {
            sink.emit(terminal).await;
            return;
        }
    }
}

fn read_error(err: LinesCodecError) -> LlmError {
    match err {
        LinesCodecError::Io(e) if e.kind() == io::ErrorKind::InvalidData => LlmError::Parse {
            message: "Stream record is not valid UTF-8".to_string(),
            source: Box::new(e),
        },
        LinesCodecError::Io(e) => LlmError::Network {
            message: "Error reading stream".to_string(),
            source: Box::new(e),
        },
        other => LlmError::Parse {
            message: "Stream record could not be framed".to_string(),
            source: Box::new(other),
        },
    }
}
