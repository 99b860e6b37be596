//! Service configuration read from the process environment.
//!
//! | Variable        | Meaning                                        | Default     |
//! |-----------------|------------------------------------------------|-------------|
//! | `DATABASE_URL`  | Store connection string                        | none        |
//! | `HOST`          | Bind host                                      | `0.0.0.0`   |
//! | `PORT`          | Bind port                                      | `5000`      |
//! | `STATIC_DIR`    | Directory served at `/`                        | `public`    |
//! | `CORS_ORIGINS`  | Comma-separated allowed origins                | none        |
//! | `APP_ENV`       | `test` suppresses the store connection         | none        |

use std::path::PathBuf;

use thiserror::Error;

use crate::http_server::config::{default_host, default_port, default_static_dir};
use crate::http_server::HttpServerConfig;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "PORT";
pub const STATIC_DIR_VAR: &str = "STATIC_DIR";
pub const CORS_ORIGINS_VAR: &str = "CORS_ORIGINS";
pub const APP_ENV_VAR: &str = "APP_ENV";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Full service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Store connection string, if configured
    pub database_url: Option<String>,
    /// Skip connecting to the store (test runs)
    pub skip_database: bool,
    pub http: HttpServerConfig,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match var(PORT_VAR) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                name: PORT_VAR,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => default_port(),
        };

        let cors_origins = var(CORS_ORIGINS_VAR)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let skip_database = var(APP_ENV_VAR)
            .map(|env| env.eq_ignore_ascii_case("test"))
            .unwrap_or(false);

        Ok(Self {
            database_url: var(DATABASE_URL_VAR),
            skip_database,
            http: HttpServerConfig {
                host: var(HOST_VAR).unwrap_or_else(default_host),
                port,
                static_dir: var(STATIC_DIR_VAR)
                    .map(PathBuf::from)
                    .unwrap_or_else(default_static_dir),
                cors_origins,
            },
        })
    }
}
