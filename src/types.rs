//! Public types for the stashdb unified API.
//!
//! This module re-exports types from internal crates with a clean public
//! interface.

// ============================================================================
// Public API types - these are what users should use
// ============================================================================

// Core value types
pub use stash_core::{Attr, Item, Key, Number};
pub use stash_core::{item_from_json, item_to_json};

// Table model
pub use stash_core::{
    BillingMode, KeyDefinition, KeySchema, KeyType, TableDescription, TableSpec, TableStatus,
};

// Errors and configuration
pub use stash_core::{Result, StashError, StoreConfig};

// Engine boundary
pub use stash_engine::{MemoryEngine, ScanFilter, StorageEngine};

// Facades
pub use stash_memory::{extract_urls, generate_id, MemoryRecord, MemoryStore};
pub use stash_store::{ItemStore, TableManager};
