use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::error::ApplicationError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://genieus.db";
pub const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    #[serde(rename = "databaseUrl")]
    pub database_url: String,
    #[serde(rename = "maxConnections")]
    pub max_connections: u32,
    #[serde(rename = "acquireTimeout")]
    pub acquire_timeout: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

impl StorageConfig {
    /// Reads `GENIEUS_DATABASE_URL`, `GENIEUS_DB_MAX_CONNECTIONS` and
    /// `GENIEUS_DB_ACQUIRE_TIMEOUT_SECS`, falling back to defaults for unset
    /// variables.
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: IN_MEMORY_DATABASE_URL.to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ApplicationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("GENIEUS_DATABASE_URL").unwrap_or(defaults.database_url);

        let max_connections = match lookup("GENIEUS_DB_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                ApplicationError::Configuration(format!(
                    "GENIEUS_DB_MAX_CONNECTIONS must be a positive integer, got '{}'",
                    raw
                ))
            })?,
            None => defaults.max_connections,
        };

        let acquire_timeout = match lookup("GENIEUS_DB_ACQUIRE_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    ApplicationError::Configuration(format!(
                        "GENIEUS_DB_ACQUIRE_TIMEOUT_SECS must be a number of seconds, got '{}'",
                        raw
                    ))
                })?,
            None => defaults.acquire_timeout,
        };

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout,
        })
    }
}
