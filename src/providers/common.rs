//! Common provider types and traits for OpenAI-compatible providers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported AI providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAi,
    OpenRouter,
}

impl AiProvider {
    /// Returns the provider identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::OpenRouter => "openrouter",
        }
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "openrouter" => Ok(AiProvider::OpenRouter),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parsed model identifier with provider and model name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIdentifier {
    pub provider: AiProvider,
    pub model: String,
}

impl ModelIdentifier {
    /// Parse a model string (supports both "provider:model" and bare "model" formats)
    ///
    /// A prefix that is not a known provider is part of the model name, so
    /// Ollama-style tags like "qwen2:0.5b" go to the default provider.
    pub fn parse(input: &str, default_provider: AiProvider) -> Result<Self, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if let Some((prefix, model)) = input.split_once(':') {
            if let Ok(provider) = AiProvider::from_str(prefix) {
                if model.is_empty() {
                    return Err(format!("Invalid model format: {}", input));
                }
                return Ok(ModelIdentifier {
                    provider,
                    model: model.to_string(),
                });
            }
        }

        Ok(ModelIdentifier {
            provider: default_provider,
            model: input.to_string(),
        })
    }

}

impl std::fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider.as_str(), self.model)
    }
}
