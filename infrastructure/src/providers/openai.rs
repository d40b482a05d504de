//! OpenAI-compatible chat completions adapter.
//!
//! Serves OpenAI itself and any provider exposing the same streaming
//! `/chat/completions` API (Google's Gemini endpoint among them).

use super::sse::SseEvent;
use super::{
    ProviderAdapter, ProviderSettings, SseAction, check_status, spawn_sse_stream, transport_error,
};
use async_trait::async_trait;
use reqwest::Client;
use roundtable_application::ports::llm_gateway::{GatewayError, GenerationRequest, StreamHandle};
use roundtable_domain::{BackendBinding, Message, Provider};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    error: Option<ChunkError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkError {
    message: String,
}

/// Interpret one SSE event of a chat completions stream
pub(crate) fn parse_event(event: &SseEvent) -> SseAction {
    let data = event.data.trim();
    if data.is_empty() {
        return SseAction::Skip;
    }
    if data == "[DONE]" {
        return SseAction::Done;
    }

    let chunk: ChatChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => return SseAction::Error(format!("malformed stream chunk: {}", e)),
    };
    if let Some(error) = chunk.error {
        return SseAction::Error(error.message);
    }

    let Some(choice) = chunk.choices.into_iter().next() else {
        return SseAction::Skip;
    };
    let text = choice.delta.content.unwrap_or_default();
    if choice.finish_reason.is_some() {
        SseAction::Last(text)
    } else {
        SseAction::Delta(text)
    }
}

pub struct OpenAiCompatibleAdapter {
    client: Client,
    kind: Provider,
    settings: ProviderSettings,
}

impl OpenAiCompatibleAdapter {
    pub fn new(kind: Provider, settings: ProviderSettings) -> Self {
        Self {
            client: Client::new(),
            kind,
            settings,
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn kind(&self) -> Provider {
        self.kind
    }

    async fn stream(
        &self,
        binding: &BackendBinding,
        request: GenerationRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let url = format!("{}/chat/completions", self.settings.base_url);
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: &request.system_prompt,
        });
        messages.extend(request.messages.iter().map(ChatMessage::from));

        let body = ChatRequest {
            model: binding.model(),
            messages,
            max_tokens: self.settings.max_tokens,
            stream: true,
        };

        debug!(provider = %self.kind, model = binding.model(), "POST {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, binding.model()).await?;

        Ok(spawn_sse_stream(response, parse_event))
    }
}
