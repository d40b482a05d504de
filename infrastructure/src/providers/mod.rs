//! Generation backends
//!
//! Each [`ProviderAdapter`] speaks one provider's streaming HTTP API and
//! pushes [`StreamEvent`]s into a channel; [`RoutingGateway`] picks the
//! adapter for a binding's provider.

pub mod anthropic;
pub mod openai;
pub mod routing;
pub mod sse;

pub use anthropic::AnthropicAdapter;
pub use openai::OpenAiCompatibleAdapter;
pub use routing::RoutingGateway;

use async_trait::async_trait;
use futures::StreamExt;
use roundtable_application::ports::llm_gateway::{GatewayError, GenerationRequest, StreamHandle};
use roundtable_domain::{BackendBinding, Provider, StreamEvent};
use sse::{SseDecoder, SseEvent};
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> Provider;

    /// Start a streaming call for `binding.model()`
    async fn stream(
        &self,
        binding: &BackendBinding,
        request: GenerationRequest,
    ) -> Result<StreamHandle, GatewayError>;
}

/// Resolved connection settings for one adapter
#[derive(Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub max_tokens: u32,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_tokens,
        }
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// What a provider-specific parser made of one SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseAction {
    /// Text to forward
    Delta(String),
    /// Final text fragment (may be empty); the stream is complete
    Last(String),
    /// The stream is complete
    Done,
    /// The provider reported an error mid-stream
    Error(String),
    /// Nothing to forward
    Skip,
}

/// Map a failed `send()` to a gateway error
pub(crate) fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

/// Fail on non-2xx responses, keeping a short excerpt of the body
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let excerpt = roundtable_domain::truncate_with_ellipsis(body.trim(), 200);
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(GatewayError::ModelNotAvailable(format!(
            "{}: HTTP {} {}",
            model, status, excerpt
        )));
    }
    Err(GatewayError::RequestFailed(format!(
        "HTTP {}: {}",
        status, excerpt
    )))
}

/// Decode an SSE body in a background task and forward it as stream events.
///
/// The channel closes without a terminal event when the body ends before
/// the provider signalled completion.
pub(crate) fn spawn_sse_stream<F>(response: reqwest::Response, mut parse: F) -> StreamHandle
where
    F: FnMut(&SseEvent) -> SseAction + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut forwarder = Forwarder {
            tx,
            full: String::new(),
        };

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    forwarder.fail(e.to_string()).await;
                    return;
                }
            };
            for event in decoder.push(&chunk) {
                if !forwarder.forward(parse(&event)).await {
                    return;
                }
            }
        }

        if let Some(event) = decoder.finish()
            && !forwarder.forward(parse(&event)).await
        {
            return;
        }
        debug!("Response body ended before the stream completed");
    });

    StreamHandle::new(rx)
}

struct Forwarder {
    tx: mpsc::Sender<StreamEvent>,
    full: String,
}

impl Forwarder {
    /// Returns false once the stream is finished or nobody is listening
    async fn forward(&mut self, action: SseAction) -> bool {
        match action {
            SseAction::Delta(text) => self.delta(text).await,
            SseAction::Last(text) => {
                if self.delta(text).await {
                    self.complete().await;
                }
                false
            }
            SseAction::Done => {
                self.complete().await;
                false
            }
            SseAction::Error(message) => {
                self.fail(message).await;
                false
            }
            SseAction::Skip => true,
        }
    }

    async fn delta(&mut self, text: String) -> bool {
        if text.is_empty() {
            return true;
        }
        self.full.push_str(&text);
        self.tx.send(StreamEvent::Delta(text)).await.is_ok()
    }

    async fn complete(&mut self) {
        let full = std::mem::take(&mut self.full);
        let _ = self.tx.send(StreamEvent::Completed(full)).await;
    }

    async fn fail(&mut self, message: String) {
        let _ = self.tx.send(StreamEvent::Error(message)).await;
    }
}
