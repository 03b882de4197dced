//! Chat handlers
//!
//! Every submission is a fresh single-turn exchange. Nothing is persisted.

use axum::{
    extract::{Path, State},
    response::Html,
    Form,
};
use minijinja::context;

use super::{acquire_db_connection, log_handler_error};
use crate::{
    error::Result,
    models::chat::ConversationTurn,
    models::requests::ChatForm,
    services::chat::converse,
    services::ojous as ojou_services,
    state::AppState,
};

/// GET /chat/{id}
pub async fn chat_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    let mut conn = acquire_db_connection(&state, "chat_page").await?;
    let ojou = ojou_services::get_ojou(&mut conn, id)
        .await
        .inspect_err(|e| log_handler_error("chat_page", e))?;

    let conversation: Vec<ConversationTurn> = Vec::new();
    let html = state.templates.render(
        "chat.html",
        context! { ojou => ojou, conversation => conversation },
    )?;

    Ok(Html(html))
}

/// POST /chat/{id}
///
/// Sends `user_input` to the configured model in the ojou's voice and
/// renders the two-turn conversation. Blank input renders the empty page.
pub async fn chat_submit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ChatForm>,
) -> Result<Html<String>> {
    let mut conn = acquire_db_connection(&state, "chat_submit").await?;
    let ojou = ojou_services::get_ojou(&mut conn, id)
        .await
        .inspect_err(|e| log_handler_error("chat_submit", e))?;
    drop(conn);

    let user_input = form.user_input.unwrap_or_default();
    let conversation = if user_input.trim().is_empty() {
        Vec::new()
    } else {
        converse(state.chat.as_ref(), &ojou, &user_input, &state.config.ai.default_model)
            .await
            .inspect_err(|e| log_handler_error("chat_submit", e))?
    };

    let html = state.templates.render(
        "chat.html",
        context! { ojou => ojou, conversation => conversation },
    )?;

    Ok(Html(html))
}
