//! OpenRouter provider implementation (OpenAI-compatible)

use rig::client::CompletionClient;
use rig::providers::openrouter::Client;
use secrecy::{ExposeSecret, SecretString};

use super::Agent;
use crate::error::{Error, Result};

/// OpenRouter provider
///
/// OpenRouter provides access to multiple models through a unified API.
pub struct OpenRouterProvider {
    client: Client,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider
    pub fn new(api_key: &SecretString) -> Result<Self> {
        let client = Client::new(api_key.expose_secret())
            .map_err(|e| Error::Completion(format!("Failed to create OpenRouter client: {:?}", e)))?;

        Ok(Self { client })
    }

    /// Builds a single-turn agent with `preamble` as its system prompt
    pub fn agent(&self, model: &str, preamble: &str) -> Agent {
        Agent::OpenRouter(self.client.agent(model).preamble(preamble).build())
    }
}
