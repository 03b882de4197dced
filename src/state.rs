use crate::{
    config::Config, database::DbPool, services::chat::ChatCompleter,
    services::storage::ObjectStorage, templates::Templates,
};
use std::sync::Arc;

/// Application state shared across all HTTP handlers
///
/// Every collaborator is built once at startup and lives until shutdown.
/// Storage and chat sit behind traits so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for the ojou records
    pub pool: DbPool,
    /// Object storage for uploaded images and stories
    pub storage: Arc<dyn ObjectStorage>,
    /// Chat completion client
    pub chat: Arc<dyn ChatCompleter>,
    /// Parsed page templates
    pub templates: Arc<Templates>,
    /// Loaded configuration (default chat model, presign TTL, ...)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState instance
    ///
    /// # Arguments
    /// * `pool` - Database connection pool, migrated
    /// * `storage` - Object storage with its bucket already ensured
    /// * `chat` - Chat completion client
    /// * `templates` - Parsed page templates
    /// * `config` - Application configuration
    pub fn new(
        pool: DbPool,
        storage: Arc<dyn ObjectStorage>,
        chat: Arc<dyn ChatCompleter>,
        templates: Arc<Templates>,
        config: Config,
    ) -> Self {
        Self {
            pool,
            storage,
            chat,
            templates,
            config: Arc::new(config),
        }
    }
}
