//! # HTTP Server
//!
//! Combines the item and diagnostic routers, static asset serving, request
//! tracing and optional CORS into one axum server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use super::item_routes::item_routes;
use crate::repository::ItemRepository;

/// HTTP server for the item API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server serving `repository`
    pub fn with_config<R: ItemRepository>(config: HttpServerConfig, repository: Arc<R>) -> Self {
        let router = Self::build_router(&config, repository);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router<R: ItemRepository>(config: &HttpServerConfig, repository: Arc<R>) -> Router {
        let router = Router::new()
            .merge(health_routes())
            .nest("/api", item_routes(repository))
            .fallback_service(ServeDir::new(&config.static_dir))
            .layer(TraceLayer::new_for_http());

        match Self::cors_layer(config) {
            Some(cors) => router.layer(cors),
            None => router,
        }
    }

    fn cors_layer(config: &HttpServerConfig) -> Option<CorsLayer> {
        if config.cors_origins.is_empty() {
            return None;
        }

        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        Some(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any),
        )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "server running at http://{}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryItemRepository;

    fn memory() -> Arc<MemoryItemRepository> {
        Arc::new(MemoryItemRepository::new())
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::with_config(HttpServerConfig::with_port(8080), memory());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_cors() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string(), "\n".to_string()],
            ..HttpServerConfig::default()
        };
        let _router = HttpServer::with_config(config, memory()).router();
    }
}
