use ojou::{AppState, Config, build_router, templates::Templates};
use reqwest::{Client, redirect::Policy};
use std::sync::Arc;
use tokio::net::TcpListener;

use super::{FakeCompleter, FakeStorage, TestDb};

/// Collaborators injected into a test server
pub struct TestAppOptions {
    pub storage: FakeStorage,
    pub completer: FakeCompleter,
    pub config: Config,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            storage: FakeStorage::default(),
            completer: FakeCompleter::replying("Hmph."),
            config: Config::default(),
        }
    }
}

impl TestAppOptions {
    pub fn with_storage(mut self, storage: FakeStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_completer(mut self, completer: FakeCompleter) -> Self {
        self.completer = completer;
        self
    }
}

/// HTTP test application wrapper
///
/// Runs the full router on a random port over an in-memory database and
/// in-process fakes for storage and chat.
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client that does not follow redirects
    pub client: Client,
    pub db: TestDb,
    pub storage: Arc<FakeStorage>,
    pub completer: Arc<FakeCompleter>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::new_with_options(TestAppOptions::default()).await
    }

    pub async fn new_with_options(options: TestAppOptions) -> Self {
        let db = TestDb::new().await;
        let storage = Arc::new(options.storage);
        let completer = Arc::new(options.completer);

        let state = AppState::new(
            db.pool.clone(),
            storage.clone(),
            completer.clone(),
            Arc::new(Templates::new().expect("Failed to parse templates")),
            options.config,
        );

        // Bind to random port (port 0 tells OS to assign available port)
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        let app = build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            address,
            client,
            db,
            storage,
            completer,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}
