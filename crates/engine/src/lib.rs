//! Backing engine boundary
//!
//! `StorageEngine` is the wire protocol this layer assumes from the backing
//! key-value engine: table lifecycle plus attribute-typed item operations.
//! The facades in `stash-store` hold an engine handle and never reach past
//! this trait.
//!
//! `MemoryEngine` is the in-process implementation, used for local operation
//! and tests. It models the asynchronous `Creating -> Active -> Deleting`
//! lifecycle so that ensure-exists has a real state machine to poll.

pub mod memory;

use serde::{Deserialize, Serialize};

use stash_core::{Attr, Item, Key, Result, TableDescription, TableSpec};

pub use memory::MemoryEngine;

/// A filter predicate the engine applies during scan, before truncation.
///
/// Matching is case-sensitive; callers wanting looser matching filter
/// client-side after retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScanFilter {
    /// The named attribute is present.
    AttrExists(String),
    /// The named attribute equals the value exactly.
    AttrEquals(String, Attr),
    /// The named attribute is a list containing the value.
    ListContains(String, Attr),
}

impl ScanFilter {
    /// Evaluate the predicate against one item.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            ScanFilter::AttrExists(name) => item.contains_key(name),
            ScanFilter::AttrEquals(name, value) => item.get(name) == Some(value),
            ScanFilter::ListContains(name, value) => item
                .get(name)
                .and_then(Attr::as_l)
                .map(|items| items.contains(value))
                .unwrap_or(false),
        }
    }
}

/// The backing engine's wire protocol.
///
/// ## Contract
///
/// - Table creation and deletion are asynchronous: the call returns with the
///   table in `Creating`/`Deleting` and later describes observe the
///   transition to `Active`/absent.
/// - Item operations address only `Active` tables; others fail
///   `TableNotFound`.
/// - Absence of an item is `Ok(None)`, never an error.
/// - Scan order is engine-defined; no sorting guarantee.
pub trait StorageEngine: Send + Sync {
    /// Begin creating a table. Fails `TableAlreadyExists` if present.
    fn create_table(&self, spec: &TableSpec) -> Result<TableDescription>;

    /// Begin deleting a table. Fails `TableNotFound` if absent.
    fn delete_table(&self, name: &str) -> Result<TableDescription>;

    /// Current description and status. Fails `TableNotFound` if absent.
    fn describe_table(&self, name: &str) -> Result<TableDescription>;

    /// Names of all tables in the target environment.
    fn list_tables(&self) -> Result<Vec<String>>;

    /// Write a whole item, overwriting any existing item with the same key.
    /// The item must carry every key attribute (`Validation` otherwise).
    fn put_item(&self, table: &str, item: Item) -> Result<()>;

    /// Read an item by key. Absent keys return `Ok(None)`.
    fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>>;

    /// Merge attributes into an existing item. When the item is absent the
    /// engine creates it from key + deltas (upsert).
    fn update_item(&self, table: &str, key: &Key, deltas: Item) -> Result<()>;

    /// Delete an item by key. Idempotent; absent keys still succeed.
    fn delete_item(&self, table: &str, key: &Key) -> Result<()>;

    /// Walk items in engine-defined order, applying the filter before the
    /// limit, returning up to `limit` items (all when `None`).
    fn scan(
        &self,
        table: &str,
        limit: Option<usize>,
        filter: Option<&ScanFilter>,
    ) -> Result<Vec<Item>>;

    /// Equality lookup on the partition key, up to `limit` items.
    fn query(
        &self,
        table: &str,
        partition_value: &Attr,
        limit: Option<usize>,
    ) -> Result<Vec<Item>>;
}
