//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Connection settings for one provider API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Direct API key (not recommended; prefer the env var).
    pub api_key: Option<String>,
    /// Base URL of the API.
    pub base_url: String,
    /// Max tokens per response.
    pub max_tokens: u32,
}

impl FileProviderConfig {
    fn with(api_key_env: &str, base_url: &str) -> Self {
        Self {
            api_key_env: api_key_env.to_string(),
            api_key: None,
            base_url: base_url.to_string(),
            max_tokens: 1024,
        }
    }

    /// The API key, from the config file or the named environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self::with("OPENAI_API_KEY", "https://api.openai.com/v1")
    }
}

/// Per-provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openai: FileProviderConfig,
    pub anthropic: FileProviderConfig,
    /// Google is reached through its OpenAI-compatible endpoint.
    pub google: FileProviderConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            openai: FileProviderConfig::with("OPENAI_API_KEY", "https://api.openai.com/v1"),
            anthropic: FileProviderConfig::with("ANTHROPIC_API_KEY", "https://api.anthropic.com"),
            google: FileProviderConfig::with(
                "GEMINI_API_KEY",
                "https://generativelanguage.googleapis.com/v1beta/openai",
            ),
        }
    }
}
