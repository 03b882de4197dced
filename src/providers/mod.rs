//! Multi-provider AI support
//!
//! Chat completions can go to an OpenAI-compatible endpoint or to OpenRouter.
//! Both are reached through rig agents behind a single `Agent` type.

pub mod common;
pub mod openai;
pub mod openrouter;

// Re-export common types
pub use common::{AiProvider, ModelIdentifier};

// Re-export providers
pub use openai::OpenAiProvider;
pub use openrouter::OpenRouterProvider;

use rig::completion::{Prompt, PromptError};
use std::fmt;

/// Our unified agent type that wraps either OpenAI or OpenRouter agents
pub enum Agent {
    OpenAI(rig::agent::Agent<rig::providers::openai::CompletionModel>),
    OpenRouter(rig::agent::Agent<rig::providers::openrouter::CompletionModel>),
}

impl Agent {
    /// Sends one user message and waits for the full reply
    pub async fn prompt(&self, message: &str) -> Result<String, PromptError> {
        match self {
            Agent::OpenAI(agent) => agent.prompt(message.to_string()).await,
            Agent::OpenRouter(agent) => agent.prompt(message.to_string()).await,
        }
    }
}

// Manually implement Debug since rig::agent::Agent doesn't implement it
impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Agent::OpenAI(_) => f.debug_tuple("Agent::OpenAI").field(&"<OpenAI Agent>").finish(),
            Agent::OpenRouter(_) => f.debug_tuple("Agent::OpenRouter").field(&"<OpenRouter Agent>").finish(),
        }
    }
}
