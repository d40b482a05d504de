//! Anthropic messages API adapter (streaming).

use super::sse::SseEvent;
use super::{
    ProviderAdapter, ProviderSettings, SseAction, check_status, spawn_sse_stream, transport_error,
};
use async_trait::async_trait;
use reqwest::Client;
use roundtable_application::ports::llm_gateway::{GatewayError, GenerationRequest, StreamHandle};
use roundtable_domain::{BackendBinding, Message, Provider, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Anthropic API version header value
pub const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: String,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamPayload {
    ContentBlockDelta { delta: BlockDelta },
    MessageStop,
    Error { error: ApiError },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BlockDelta {
    TextDelta {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Interpret one SSE event of a messages stream
pub(crate) fn parse_event(event: &SseEvent) -> SseAction {
    if event.event.as_deref() == Some("ping") || event.data.trim().is_empty() {
        return SseAction::Skip;
    }

    match serde_json::from_str::<StreamPayload>(&event.data) {
        Ok(StreamPayload::ContentBlockDelta {
            delta: BlockDelta::TextDelta { text },
        }) => SseAction::Delta(text),
        Ok(StreamPayload::MessageStop) => SseAction::Done,
        Ok(StreamPayload::Error { error }) => SseAction::Error(error.message),
        Ok(_) => SseAction::Skip,
        Err(e) => SseAction::Error(format!("malformed stream event: {}", e)),
    }
}

/// Split system messages out of the history; the API takes them separately
fn split_system<'a>(
    system_prompt: &str,
    messages: &'a [Message],
) -> (String, Vec<WireMessage<'a>>) {
    let mut system = system_prompt.to_string();
    let mut wire = Vec::with_capacity(messages.len());
    for message in messages {
        match message.role {
            Role::System => {
                if !system.is_empty() {
                    system.push_str("\n\n");
                }
                system.push_str(&message.content);
            }
            role => wire.push(WireMessage {
                role: role.as_str(),
                content: &message.content,
            }),
        }
    }
    (system, wire)
}

pub struct AnthropicAdapter {
    client: Client,
    settings: ProviderSettings,
}

impl AnthropicAdapter {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> Provider {
        Provider::Anthropic
    }

    async fn stream(
        &self,
        binding: &BackendBinding,
        request: GenerationRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let url = format!("{}/v1/messages", self.settings.base_url);
        let (system, messages) = split_system(&request.system_prompt, &request.messages);
        let body = MessagesRequest {
            model: binding.model(),
            max_tokens: self.settings.max_tokens,
            system,
            messages,
            stream: true,
        };

        debug!(model = binding.model(), "POST {}", url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, binding.model()).await?;

        Ok(spawn_sse_stream(response, parse_event))
    }
}
