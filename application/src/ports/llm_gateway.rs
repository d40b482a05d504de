//! LLM Gateway port
//!
//! Defines the interface for calling generation backends.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use roundtable_domain::{BackendBinding, Message, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during a generation call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,
}

/// Everything a backend needs for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub messages: Vec<Message>,
}

impl GenerationRequest {
    pub fn new(system_prompt: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages,
        }
    }

    /// A request whose history is a single user instruction
    pub fn with_instruction(system_prompt: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self::new(system_prompt, vec![Message::user(instruction)])
    }
}

/// Lazy, finite, non-restartable sequence of text fragments
pub type FragmentStream = BoxStream<'static, Result<String, GatewayError>>;

/// Handle for receiving streaming events from a generation call.
///
/// Adapters push [`StreamEvent`]s into the sending half; the scheduler
/// consumes the handle as a [`FragmentStream`].
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Build an already-filled handle from a fixed list of events
    pub fn from_events(events: Vec<StreamEvent>) -> Self {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // Capacity covers every event, so this never fails
            let _ = tx.try_send(event);
        }
        Self::new(rx)
    }

    /// Turn the event channel into a fragment stream.
    ///
    /// `Delta` events become fragments. `Completed` ends the stream; its text
    /// is only yielded when no delta arrived before it. `Error` and a channel
    /// that closes without a terminal event both end the stream with an error.
    pub fn into_fragments(self) -> FragmentStream {
        stream::unfold(Some((self.receiver, false)), |state| async move {
            let (mut receiver, emitted) = state?;
            loop {
                match receiver.recv().await {
                    Some(StreamEvent::Delta(chunk)) => {
                        if chunk.is_empty() {
                            continue;
                        }
                        return Some((Ok(chunk), Some((receiver, true))));
                    }
                    Some(StreamEvent::Completed(full)) => {
                        if !emitted && !full.is_empty() {
                            return Some((Ok(full), None));
                        }
                        return None;
                    }
                    Some(StreamEvent::Error(e)) => {
                        return Some((Err(GatewayError::RequestFailed(e)), None));
                    }
                    None => return Some((Err(GatewayError::TransportClosed), None)),
                }
            }
        })
        .boxed()
    }
}

/// Gateway for generation backends
///
/// This port defines how the application layer reaches text-generation
/// providers. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Start a streaming generation call on `binding`
    async fn generate(
        &self,
        binding: &BackendBinding,
        request: GenerationRequest,
    ) -> Result<StreamHandle, GatewayError>;
}
