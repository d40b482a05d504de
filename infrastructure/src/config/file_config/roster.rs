//! Personas and backends from TOML (`[[personas]]` and `[[backends]]`)

use roundtable_domain::{BackendBinding, DomainError, Persona, Provider};
use serde::{Deserialize, Serialize};

/// Raw persona entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePersonaConfig {
    pub id: String,
    /// Display name used in the transcript
    pub name: String,
    /// Short role label, e.g. "Optimist"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// System instruction defining the persona's voice
    pub instruction: String,
}

impl FilePersonaConfig {
    fn new(id: &str, name: &str, tagline: &str, instruction: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tagline: Some(tagline.to_string()),
            instruction: instruction.to_string(),
        }
    }

    pub fn to_persona(&self) -> Persona {
        let persona = Persona::new(self.id.as_str(), self.name.as_str(), self.instruction.as_str());
        match &self.tagline {
            Some(tagline) => persona.with_tagline(tagline.as_str()),
            None => persona,
        }
    }
}

/// Raw backend entry; `provider` is parsed during validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBackendConfig {
    pub id: String,
    pub provider: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FileBackendConfig {
    fn new(id: &str, provider: Provider, model: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            provider: provider.as_str().to_string(),
            model: model.to_string(),
            name: Some(name.to_string()),
        }
    }

    pub fn parse_provider(&self) -> Result<Provider, DomainError> {
        self.provider.parse()
    }

    pub fn to_binding(&self) -> Result<BackendBinding, DomainError> {
        let binding = BackendBinding::new(self.id.as_str(), self.parse_provider()?, self.model.as_str());
        Ok(match &self.name {
            Some(name) => binding.with_display_name(name.as_str()),
            None => binding,
        })
    }
}

/// The built-in roster
pub fn default_personas() -> Vec<FilePersonaConfig> {
    vec![
        FilePersonaConfig::new(
            "optimist",
            "Sunny",
            "Optimist",
            "You are Sunny, an unshakable optimist. Every problem is an opportunity \
             and every downside hides an upside. You are warm, enthusiastic and a \
             little naive. Keep every reply to 2-3 short sentences.",
        ),
        FilePersonaConfig::new(
            "pessimist",
            "Gloomy",
            "Pessimist",
            "You are Gloomy, a weary pessimist. You expect the worst, point out every \
             risk and sigh a lot, but you are never cruel. Keep every reply to 2-3 \
             short sentences.",
        ),
        FilePersonaConfig::new(
            "meme",
            "Doge",
            "Meme addict",
            "You are Doge, who has spent far too long online. You answer in memes, \
             internet slang and wild tangents, yet you always react to what was \
             just said. Keep every reply to 2-3 short sentences.",
        ),
    ]
}

/// The built-in backend pool, one binding per provider
pub fn default_backends() -> Vec<FileBackendConfig> {
    vec![
        FileBackendConfig::new("gpt", Provider::OpenAi, "gpt-4o", "GPT-4o"),
        FileBackendConfig::new(
            "claude",
            Provider::Anthropic,
            "claude-3-5-sonnet-latest",
            "Claude 3.5 Sonnet",
        ),
        FileBackendConfig::new("gemini", Provider::Google, "gemini-2.0-flash", "Gemini 2.0 Flash"),
    ]
}
