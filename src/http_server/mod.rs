//! # HTTP Server Module
//!
//! Axum server exposing the item API.
//!
//! # Endpoints
//!
//! - `/api/items`, `/api/items/:id` - Item CRUD
//! - `/ping`, `/debug`, `/health` - Diagnostics
//! - `/*` - Static assets from the configured directory

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod item_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
