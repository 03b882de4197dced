pub mod agents;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod queries;
pub mod services;
pub mod state;
pub mod templates;
pub mod validation;

pub use config::Config;
pub use database::{DbConn, DbPool};
pub use error::{Error, Result};
pub use state::AppState;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::trace::TraceLayer;

/// Load configuration from environment variables
pub fn load_config() -> Result<Config> {
    Ok(Config::load()?)
}

/// Builds the application router over `state`.
///
/// The body limit comes from `server.max_upload_bytes` and covers the whole
/// multipart upload, both files included.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/upload", get(handlers::upload_form).post(handlers::upload_ojou))
        .route("/ojou/{id}", get(handlers::ojou_detail))
        .route("/chat/{id}", get(handlers::chat_page).post(handlers::chat_submit))
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
