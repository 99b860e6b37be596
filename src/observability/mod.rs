//! Observability: structured logging through `tracing`.
//!
//! HTTP requests are traced by the `TraceLayer` installed in
//! [`HttpServer`](crate::http_server::HttpServer); this module only sets up
//! the subscriber.

mod logging;

pub use logging::{init_logging, DEFAULT_LOG_FILTER};
