//! Syntestify Server
//!
//! HTTP JSON API over the generation pipeline and the persistence gateway.
//! Each request is handled independently; the only suspension points are
//! the completion call and store access, awaited sequentially.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use std::sync::{Arc, Mutex};
use syntestify_generator::Generator;
use syntestify_llm::OpenAiProvider;
use syntestify_store::SqliteStore;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Store initialization error
    #[error("Store error: {0}")]
    Store(#[from] syntestify_store::StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Opens the store, wires the generator when a credential is configured,
/// and serves the axum router until shutdown.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("Starting Syntestify server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database path: {}", config.database_path);

    let store = Arc::new(Mutex::new(SqliteStore::new(&config.database_path)?));

    let generator = match &config.openai.api_key {
        Some(api_key) => {
            info!(
                "Completion provider configured: {} via {}",
                config.openai.model, config.openai.endpoint
            );
            let provider = OpenAiProvider::new(api_key)
                .with_endpoint(&config.openai.endpoint)
                .with_model(&config.openai.model);
            Some(Arc::new(Generator::new(
                Arc::new(provider),
                Arc::clone(&store),
            )))
        }
        None => {
            warn!("No OpenAI API key configured; generate requests will fail");
            None
        }
    };

    let state = AppState { generator, store };
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
