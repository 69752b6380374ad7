//! Table lifecycle and item store facades
//!
//! Stateless facades over an `Arc<dyn StorageEngine>`:
//! - `TableManager`: describe/list/create/delete plus the idempotent
//!   ensure_exists with bounded-backoff activation polling
//! - `ItemStore`: per-table put/get/update/delete/scan/query with JSON
//!   codec helpers at the application boundary

pub mod items;
pub mod tables;

pub use stash_core::config::DEFAULT_CREATE_TIMEOUT;

pub use items::ItemStore;
pub use tables::TableManager;
