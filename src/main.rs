use std::sync::Arc;

use ojou::{
    AppState, build_router, database, load_config,
    services::chat::RigChatService,
    services::storage::{ObjectStorage, S3ObjectStorage},
    templates::Templates,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ojou=info,tower_http=info")),
        )
        .init();

    let config = load_config()?;
    tracing::info!(config = %config, "Configuration loaded");

    let pool = database::connect(&config.database).await?;

    let storage = S3ObjectStorage::new(&config.storage);
    storage.ensure_bucket().await?;

    let chat = RigChatService::new(&config.ai)?;
    let templates = Templates::new()?;

    let bind_address = config.server.bind_address();
    let state = AppState::new(
        pool,
        Arc::new(storage),
        Arc::new(chat),
        Arc::new(templates),
        config,
    );

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %bind_address, "Listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
