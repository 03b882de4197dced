//! Persona chat
//!
//! One exchange per request: the ojou's system prompt plus the visitor's
//! message go to the completion API, and the reply comes back as the second
//! turn of a two-turn conversation. Nothing is remembered between requests.

pub mod rig_engine;

pub use rig_engine::RigChatService;

use async_trait::async_trait;

use crate::{
    agents::build_system_prompt,
    error::Result,
    models::{chat::ConversationTurn, ojous::Ojou},
};

/// Completion API seam. Stateless: each call carries the full context.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Returns the assistant reply for `user_message` under `system_prompt`.
    async fn complete(&self, system_prompt: &str, user_message: &str, model: &str) -> Result<String>;
}

/// Runs a single exchange with `ojou` and returns `[user, ojou]` turns.
pub async fn converse(
    completer: &dyn ChatCompleter,
    ojou: &Ojou,
    user_message: &str,
    model: &str,
) -> Result<Vec<ConversationTurn>> {
    let system_prompt = build_system_prompt(ojou);

    tracing::info!(
        operation = "converse",
        ojou_id = ojou.id,
        model = %model,
        message_length = user_message.len(),
        "Sending chat message",
    );

    let reply = completer.complete(&system_prompt, user_message, model).await?;

    Ok(vec![
        ConversationTurn::user(user_message),
        ConversationTurn::ojou(reply),
    ])
}
