use std::path::PathBuf;

use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{AnyStore, InMemoryDocumentStore, StoreError, DEFAULT_INDEX_PREFIX};
use crate::telemetry::TelemetryConfig;

#[cfg(feature = "redb")]
use crate::store::RedbDocumentStore;

/// Prefix of every environment variable read by [`RegistryConfig::from_env`].
pub const ENV_PREFIX: &str = "LAUNDRY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("unknown store backend '{0}', expected: memory, redb")]
    UnknownBackend(String),

    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistryConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Store backend: memory or redb
    #[serde(default = "default_store")]
    pub store: String,

    /// Database file for the redb backend
    #[serde(default = "default_redb_path")]
    pub redb_path: PathBuf,

    /// Key prefix covered by the machine search index
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            store: default_store(),
            redb_path: default_redb_path(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl RegistryConfig {
    /// Load configuration from `LAUNDRY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level.clone(),
            json: self.log_json,
        }
    }

    /// Open the configured store backend.
    pub fn open_store(&self) -> Result<AnyStore, ConfigError> {
        match self.store.as_str() {
            "memory" => Ok(InMemoryDocumentStore::with_index_prefix(&self.key_prefix).into()),
            #[cfg(feature = "redb")]
            "redb" => Ok(
                RedbDocumentStore::open_with_index_prefix(&self.redb_path, &self.key_prefix)?
                    .into(),
            ),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_store() -> String {
    "memory".to_string()
}

fn default_redb_path() -> PathBuf {
    PathBuf::from("laundry.redb")
}

fn default_key_prefix() -> String {
    DEFAULT_INDEX_PREFIX.to_string()
}
