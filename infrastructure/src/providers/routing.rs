use super::{AnthropicAdapter, OpenAiCompatibleAdapter, ProviderAdapter, ProviderSettings};
use crate::config::{FileProviderConfig, FileProvidersConfig};
use async_trait::async_trait;
use roundtable_application::ports::llm_gateway::{
    GatewayError, GenerationRequest, LlmGateway, StreamHandle,
};
use roundtable_domain::{BackendBinding, Provider};
use std::sync::Arc;
use tracing::{debug, warn};

/// Gateway dispatching each call to the adapter for the binding's provider.
pub struct RoutingGateway {
    providers: Vec<Arc<dyn ProviderAdapter>>,
}

impl RoutingGateway {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { providers }
    }

    /// Build adapters for every provider in `in_use` that has an API key.
    ///
    /// A provider without a key gets no adapter; calls on its bindings then
    /// fail individually instead of aborting the whole discussion.
    pub fn from_config(
        config: &FileProvidersConfig,
        in_use: impl IntoIterator<Item = Provider>,
    ) -> Self {
        let mut providers: Vec<Arc<dyn ProviderAdapter>> = Vec::new();

        for provider in in_use {
            let file = Self::provider_config(config, provider);
            let Some(api_key) = file.resolve_api_key() else {
                warn!(
                    provider = %provider,
                    "No API key found in ${}; its backends will fail",
                    file.api_key_env
                );
                continue;
            };

            let settings = ProviderSettings::new(api_key, file.base_url.as_str(), file.max_tokens);
            debug!(provider = %provider, base_url = %settings.base_url, "Provider configured");
            let adapter: Arc<dyn ProviderAdapter> = match provider {
                Provider::Anthropic => Arc::new(AnthropicAdapter::new(settings)),
                Provider::OpenAi | Provider::Google => {
                    Arc::new(OpenAiCompatibleAdapter::new(provider, settings))
                }
            };
            providers.push(adapter);
        }

        Self::new(providers)
    }

    fn provider_config(config: &FileProvidersConfig, provider: Provider) -> &FileProviderConfig {
        match provider {
            Provider::OpenAi => &config.openai,
            Provider::Anthropic => &config.anthropic,
            Provider::Google => &config.google,
        }
    }

    /// Providers with a usable adapter
    pub fn configured(&self) -> Vec<Provider> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    fn resolve_provider(
        &self,
        binding: &BackendBinding,
    ) -> Result<&dyn ProviderAdapter, GatewayError> {
        self.providers
            .iter()
            .find(|p| p.kind() == binding.provider())
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                GatewayError::ModelNotAvailable(format!(
                    "no {} provider configured for {}",
                    binding.provider(),
                    binding.id()
                ))
            })
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn generate(
        &self,
        binding: &BackendBinding,
        request: GenerationRequest,
    ) -> Result<StreamHandle, GatewayError> {
        self.resolve_provider(binding)?.stream(binding, request).await
    }
}
