//! Service startup
//!
//! Boot sequence:
//! 1. Load `.env` if present
//! 2. Install the tracing subscriber
//! 3. Read configuration from the environment
//! 4. Connect the item store
//! 5. Serve HTTP until shutdown
//!
//! A store that cannot be reached does not stop the service: it starts with
//! a detached store so diagnostics stay available, and the cause is logged.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{AppConfig, ConfigError, DATABASE_URL_VAR};
use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::repository::ItemStore;

/// Result type for startup
pub type BootResult<T> = Result<T, BootError>;

/// Startup failures. Each one ends the process with a non-zero status.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to create tokio runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("HTTP server failed: {0}")]
    Server(#[source] io::Error),
}

/// Run the service until it is terminated.
pub fn run() -> BootResult<()> {
    let dotenv = dotenvy::dotenv();
    init_logging();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "failed to load .env file");
        }
    }

    let config = AppConfig::from_env()?;

    let runtime = tokio::runtime::Runtime::new().map_err(BootError::Runtime)?;
    runtime.block_on(serve(config))
}

/// Connect the store and serve HTTP with `config`.
pub async fn serve(config: AppConfig) -> BootResult<()> {
    let store = connect_store(&config);
    match store.detached_reason() {
        Some(reason) => warn!(reason, "item store detached, item routes will fail"),
        None => info!(backend = store.backend(), "item store ready"),
    }

    let server = HttpServer::with_config(config.http, Arc::new(store));
    server.start().await.map_err(BootError::Server)
}

/// Pick the item store for `config`, falling back to a detached store.
pub fn connect_store(config: &AppConfig) -> ItemStore {
    if config.skip_database {
        info!("test environment, skipping store connection");
        return ItemStore::detached("store connection disabled in test environment");
    }

    let Some(url) = config.database_url.as_deref() else {
        warn!("{} is not set, item routes will fail", DATABASE_URL_VAR);
        return ItemStore::detached(format!("{} is not set", DATABASE_URL_VAR));
    };

    match ItemStore::connect(url) {
        Ok(store) => {
            info!(backend = store.backend(), "store connected");
            store
        }
        Err(e) => {
            error!(error = %e, "store connection failed");
            ItemStore::detached(e.to_string())
        }
    }
}
