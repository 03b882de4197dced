//! OpenAI-compatible provider (OpenAI itself, or any server speaking its API)
//!
//! Requests go to `{base_url}/chat/completions`, which self-hosted servers
//! such as Ollama also serve.

use rig::client::CompletionClient;
use rig::providers::openai::{Client, CompletionsClient};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::Agent;
use crate::error::{Error, Result};

pub struct OpenAiProvider {
    client: CompletionsClient,
    base_url: Option<String>,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("client", &"<OpenAI Client>")
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a new OpenAI provider, optionally pointed at a custom base URL
    pub fn new(api_key: &SecretString, base_url: Option<&str>) -> Result<Self> {
        let client = if let Some(url) = base_url {
            tracing::info!(
                base_url = %url,
                "Creating OpenAI provider with custom base URL"
            );
            Client::builder()
                .api_key(api_key.expose_secret())
                .base_url(url)
                .build()
                .map_err(|e| Error::Completion(format!("Failed to create OpenAI client: {:?}", e)))?
                .completions_api()
        } else {
            tracing::info!("Creating OpenAI provider with default base URL");
            Client::new(api_key.expose_secret())
                .map_err(|e| Error::Completion(format!("Failed to create OpenAI client: {:?}", e)))?
                .completions_api()
        };

        Ok(Self {
            client,
            base_url: base_url.map(str::to_string),
        })
    }

    /// Builds a single-turn agent with `preamble` as its system prompt
    pub fn agent(&self, model: &str, preamble: &str) -> Agent {
        Agent::OpenAI(self.client.agent(model).preamble(preamble).build())
    }
}
