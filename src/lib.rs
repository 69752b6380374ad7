//! stashdb — durable item store facade with table lifecycle and memory
//! records for AI agents.
//!
//! The [`Stash`] handle bundles an engine with the facade constructors:
//!
//! ```
//! use stashdb::Stash;
//!
//! let stash = Stash::in_memory();
//! let memories = stash.memories();
//! let id = memories
//!     .store("remember X", "X is important", vec!["#note".into()], None, None)
//!     .unwrap();
//! assert_eq!(memories.recent(1).unwrap()[0].id, id);
//! ```
//!
//! Facades are stateless over a shared engine handle: cloning or
//! reconstructing them is cheap, and nothing is cached between calls.

mod types;

pub use types::*;

use std::sync::Arc;

/// Handle bundling an engine with its configuration.
///
/// Engines are dependency-injected rather than process-wide singletons;
/// the handle's lifetime scopes the client, and dropping it releases the
/// engine when the last facade clone goes away.
#[derive(Clone)]
pub struct Stash {
    engine: Arc<dyn StorageEngine>,
    config: StoreConfig,
}

impl Stash {
    /// In-process engine with default configuration.
    pub fn in_memory() -> Self {
        Self::with_engine(Arc::new(MemoryEngine::new()), StoreConfig::default())
    }

    /// Bring your own engine and configuration.
    pub fn with_engine(engine: Arc<dyn StorageEngine>, config: StoreConfig) -> Self {
        Self { engine, config }
    }

    /// In-process engine configured from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_engine(
            Arc::new(MemoryEngine::new()),
            StoreConfig::from_env()?,
        ))
    }

    /// The active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The shared engine handle.
    pub fn engine(&self) -> Arc<dyn StorageEngine> {
        self.engine.clone()
    }

    /// Table lifecycle operations.
    pub fn tables(&self) -> TableManager {
        TableManager::new(self.engine.clone()).with_create_timeout(self.config.create_timeout)
    }

    /// Item operations bound to one table.
    pub fn items(&self, table: impl Into<String>) -> ItemStore {
        ItemStore::new(self.engine.clone(), table)
    }

    /// The memory record layer over the configured memory table.
    pub fn memories(&self) -> MemoryStore {
        MemoryStore::new(self.engine.clone(), &self.config)
    }
}
