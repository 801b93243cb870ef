use crate::config::{Provider, ProviderConfig};
use crate::core::error::FactChatError;
use crate::providers::{LLMProvider, openai_compatible::OpenAICompatibleProvider};
use std::collections::HashMap;
use std::time::Duration;

type ProviderCreator = Box<
    dyn Fn(&ProviderConfig, Option<Duration>) -> Result<Box<dyn LLMProvider>, FactChatError>
        + Send
        + Sync,
>;

pub struct ProviderFactory {
    creators: HashMap<Provider, ProviderCreator>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut creators = HashMap::new();
        for provider in [
            Provider::OpenAI,
            Provider::OpenRouter,
            Provider::DeepSeek,
            Provider::Azure,
        ] {
            creators.insert(provider, Self::openai_compatible(provider));
        }
        Self { creators }
    }

    fn openai_compatible(provider: Provider) -> ProviderCreator {
        Box::new(move |config: &ProviderConfig, timeout: Option<Duration>| -> Result<Box<dyn LLMProvider>, FactChatError> {
            let base_url = config
                .base_url
                .clone()
                .or_else(|| provider.default_base_url().map(str::to_string))
                .ok_or_else(|| {
                    FactChatError::Config(format!(
                        "Provider {:?} needs a base_url (set AZURE_OPENAI_ENDPOINT or providers.azure.base_url)",
                        provider
                    ))
                })?;
            let api_key = config
                .api_key
                .clone()
                .or_else(|| std::env::var(provider.api_key_env()).ok())
                .unwrap_or_default();
            let model = config
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string());

            let client = OpenAICompatibleProvider::new(base_url, &api_key, model, timeout)?;
            Ok(Box::new(client) as Box<dyn LLMProvider>)
        })
    }

    pub fn create(
        &self,
        provider: &Provider,
        config: &ProviderConfig,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn LLMProvider>, FactChatError> {
        self.creators
            .get(provider)
            .ok_or_else(|| FactChatError::Config(format!("Provider not found: {:?}", provider)))
            .and_then(|creator| creator(config, timeout))
    }
}
