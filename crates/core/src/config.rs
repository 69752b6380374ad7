//! Store configuration
//!
//! Region, endpoint, and table names are passed through to the backing
//! engine opaquely; this layer validates presence only and never parses
//! them.

use std::env;
use std::time::Duration;

use crate::error::{Result, StashError};

/// Default region when the environment names none.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Default name of the memory records table.
pub const DEFAULT_MEMORY_TABLE: &str = "AIMemories";

/// Ceiling for the ensure-exists activation wait.
pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration consumed from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Target region, passed through to the engine.
    pub region: String,
    /// Optional explicit endpoint override.
    pub endpoint: Option<String>,
    /// Name of the memory records table.
    pub memory_table: String,
    /// Bounded wait ceiling for ensure-exists.
    pub create_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            memory_table: DEFAULT_MEMORY_TABLE.to_string(),
            create_timeout: DEFAULT_CREATE_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Read configuration from the environment.
    ///
    /// `STASH_REGION` and `MEMORY_TABLE_NAME` fall back to defaults;
    /// `STASH_ENDPOINT` is optional. Set-but-empty values fail validation.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            region: env::var("STASH_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            endpoint: env::var("STASH_ENDPOINT").ok(),
            memory_table: env::var("MEMORY_TABLE_NAME")
                .unwrap_or_else(|_| DEFAULT_MEMORY_TABLE.to_string()),
            create_timeout: DEFAULT_CREATE_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Presence-only validation.
    pub fn validate(&self) -> Result<()> {
        if self.region.is_empty() {
            return Err(StashError::validation("region must not be empty"));
        }
        if self.memory_table.is_empty() {
            return Err(StashError::validation("memory table name must not be empty"));
        }
        if matches!(self.endpoint.as_deref(), Some("")) {
            return Err(StashError::validation("endpoint must not be empty when set"));
        }
        Ok(())
    }
}
