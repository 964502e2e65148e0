use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;
use clap::Parser;
use movies_core::store::BackendKind;
use movies_db::{StoreConfig, DEFAULT_MOVIES_FILE};

/// Command-line arguments for the API binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "movies-api", version, about = "Movies CRUD service")]
pub struct Cli {
    /// Storage backend: local, document (mongodb) or relational (mysql).
    #[arg(long, env = "MOVIES_BACKEND", default_value = "local")]
    pub backend: BackendKind,
}

/// A configuration value that could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`). Falls back to an OS-assigned port when taken.
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 3000, "u16")?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if let Some(bad) = cors_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::Invalid {
                name: "CORS_ORIGINS",
                expected: "origin list",
                value: bad.clone(),
            });
        }

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30, "u64")?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        })
    }
}

/// Load backend connection settings from environment variables.
///
/// | Env Var          | Default                        |
/// |------------------|--------------------------------|
/// | `MOVIES_FILE`    | `crates/db/data/movies.json`   |
/// | `MONGO_URI`      | none                           |
/// | `MONGO_DB`       | none                           |
/// | `DATABASE_URL`   | none                           |
/// | `RUN_MIGRATIONS` | `true`                         |
pub fn store_config_from_env() -> Result<StoreConfig, ConfigError> {
    store_config_from_lookup(|name| std::env::var(name).ok())
}

pub fn store_config_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<StoreConfig, ConfigError> {
    Ok(StoreConfig {
        movies_file: lookup("MOVIES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MOVIES_FILE)),
        mongo_uri: lookup("MONGO_URI"),
        mongo_db: lookup("MONGO_DB"),
        database_url: lookup("DATABASE_URL"),
        run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true, "bool")?,
    })
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|_| ConfigError::Invalid {
                name,
                expected,
                value,
            })
        }
        None => Ok(default),
    }
}
