//! Engine configuration: which storage backend the engine wires up.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Selects the storage backend.
pub const STORAGE_ENV: &str = "FOCUSQUEST_STORAGE";
/// Directory holding the JSON documents of the `file` backend.
pub const DATA_DIR_ENV: &str = "FOCUSQUEST_DATA_DIR";
/// Connection URL of the `postgres` backend.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Pool size of the `postgres` backend.
pub const PG_MAX_CONNECTIONS_ENV: &str = "FOCUSQUEST_PG_MAX_CONNECTIONS";

const DEFAULT_DATA_DIR: &str = ".focusquest";
const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The storage selector names no known backend.
    #[error("unknown storage backend '{0}', expected memory, file, or postgres")]
    UnknownBackend(String),
    /// A setting the selected backend needs is absent.
    #[error("{0} must be set for the selected storage backend")]
    Missing(&'static str),
    /// A setting could not be parsed.
    #[error("{name} has invalid value '{value}'")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Storage backend and its settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Process-local maps; nothing survives a restart.
    #[default]
    Memory,
    /// One JSON document per owner and collection under `directory`.
    File {
        /// Directory holding the documents, created when missing.
        directory: Utf8PathBuf,
    },
    /// `PostgreSQL` tables `tasks` and `user_progress`.
    Postgres {
        /// Connection URL.
        database_url: String,
        /// Upper bound of the connection pool.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
}

const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Storage backend.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl EngineConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the backend selector is unknown or a
    /// setting it needs is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// An unset or blank selector chooses the in-memory backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the backend selector is unknown or a
    /// setting it needs is missing or malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let selector = read(STORAGE_ENV).unwrap_or_default().to_ascii_lowercase();
        let storage = match selector.as_str() {
            "" | "memory" => StorageConfig::Memory,
            "file" => StorageConfig::File {
                directory: Utf8PathBuf::from(
                    read(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_owned()),
                ),
            },
            "postgres" => {
                let database_url =
                    read(DATABASE_URL_ENV).ok_or(ConfigError::Missing(DATABASE_URL_ENV))?;
                let max_connections = match read(PG_MAX_CONNECTIONS_ENV) {
                    None => DEFAULT_MAX_CONNECTIONS,
                    Some(value) => parse_pool_size(&value)?,
                };
                StorageConfig::Postgres {
                    database_url,
                    max_connections,
                }
            }
            other => return Err(ConfigError::UnknownBackend(other.to_owned())),
        };
        Ok(Self { storage })
    }
}

fn parse_pool_size(value: &str) -> Result<u32, ConfigError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| ConfigError::Invalid {
            name: PG_MAX_CONNECTIONS_ENV,
            value: value.to_owned(),
        })
}
