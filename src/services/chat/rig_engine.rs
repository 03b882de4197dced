use async_trait::async_trait;

use super::ChatCompleter;
use crate::config::AiConfig;
use crate::error::{Error, Result};
use crate::providers::{Agent, AiProvider, ModelIdentifier, OpenAiProvider, OpenRouterProvider};

/// Chat completions through rig.rs providers.
///
/// The OpenAI-compatible provider is always available. OpenRouter is only
/// reachable when it has been configured.
pub struct RigChatService {
    openai: OpenAiProvider,
    openrouter: Option<OpenRouterProvider>,
    default_provider: AiProvider,
}

impl RigChatService {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let openai = OpenAiProvider::new(&config.openai.api_key, config.openai.base_url.as_deref())?;

        let openrouter = match &config.openrouter {
            Some(openrouter) => Some(OpenRouterProvider::new(&openrouter.api_key)?),
            None => None,
        };

        Ok(Self {
            openai,
            openrouter,
            default_provider: config.default_provider,
        })
    }

    /// Creates a RigChatService for testing purposes. Never reaches a real endpoint.
    #[cfg(test)]
    pub fn dummy() -> Result<Self> {
        Self::new(&AiConfig {
            openai: crate::config::OpenAiConfig {
                api_key: "sk-dummy".to_string().into(),
                base_url: Some("http://127.0.0.1:9/v1".to_string()),
            },
            ..AiConfig::default()
        })
    }

    /// Resolves `model` to a provider and builds an agent around `preamble`.
    pub fn create_agent(&self, model: &str, preamble: &str) -> Result<Agent> {
        let identifier = ModelIdentifier::parse(model, self.default_provider).map_err(Error::Completion)?;

        match identifier.provider {
            AiProvider::OpenAi => Ok(self.openai.agent(&identifier.model, preamble)),
            AiProvider::OpenRouter => self
                .openrouter
                .as_ref()
                .map(|provider| provider.agent(&identifier.model, preamble))
                .ok_or_else(|| Error::Completion("OpenRouter provider is not configured".to_string())),
        }
    }
}

#[async_trait]
impl ChatCompleter for RigChatService {
    async fn complete(&self, system_prompt: &str, user_message: &str, model: &str) -> Result<String> {
        let agent = self.create_agent(model, system_prompt)?;

        let reply = agent.prompt(user_message).await.map_err(|e| {
            tracing::warn!(model = %model, error = %e, "Completion request failed");
            Error::Completion(e.to_string())
        })?;

        Ok(reply.trim().to_string())
    }
}
