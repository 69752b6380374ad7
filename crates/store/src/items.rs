//! Item store facade
//!
//! Bound to one table, holding only the engine handle. Storage-side methods
//! work in `Attr` items; the `*_json` helpers apply the codec so callers can
//! stay in `serde_json::Value` while the stored form keeps exact decimals.

use std::sync::Arc;

use stash_core::{item_from_json, item_to_json, Attr, Item, Key, Result};
use stash_engine::{ScanFilter, StorageEngine};

/// Item CRUD, scan, and partition-key query against a single table.
///
/// # Thread Safety
///
/// Clone is cheap (Arc clone); instances sharing an engine see the same
/// data. No advisory locks are held here: concurrent puts to one key race
/// per the engine's own write ordering.
#[derive(Clone)]
pub struct ItemStore {
    engine: Arc<dyn StorageEngine>,
    table: String,
}

impl ItemStore {
    /// Facade over `table` on the given engine.
    pub fn new(engine: Arc<dyn StorageEngine>, table: impl Into<String>) -> Self {
        Self {
            engine,
            table: table.into(),
        }
    }

    /// The table this store is bound to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Write a whole item, overwriting any existing item with the same key.
    pub fn put(&self, item: Item) -> Result<()> {
        self.engine.put_item(&self.table, item)?;
        tracing::debug!(table = %self.table, "item written");
        Ok(())
    }

    /// Read an item by key. Absence is `Ok(None)`, not an error.
    pub fn get(&self, key: &Key) -> Result<Option<Item>> {
        self.engine.get_item(&self.table, key)
    }

    /// Merge attributes into the item at `key`; unnamed attributes are
    /// untouched. When the item is absent the engine creates it from
    /// key + deltas — an upsert, by design, not concealed.
    pub fn update(&self, key: &Key, deltas: Item) -> Result<()> {
        self.engine.update_item(&self.table, key, deltas)?;
        tracing::debug!(table = %self.table, "item updated");
        Ok(())
    }

    /// Delete by key. Idempotent: deleting an absent key succeeds.
    pub fn delete(&self, key: &Key) -> Result<()> {
        self.engine.delete_item(&self.table, key)?;
        tracing::debug!(table = %self.table, "item deleted");
        Ok(())
    }

    /// Up to `limit` items in engine-defined order, filter applied before
    /// truncation. Not exhaustive over tables larger than one scan page;
    /// callers wanting full enumeration pass `None`.
    pub fn scan(&self, limit: Option<usize>, filter: Option<&ScanFilter>) -> Result<Vec<Item>> {
        self.engine.scan(&self.table, limit, filter)
    }

    /// Equality lookup on the partition key, up to `limit` items. No sort
    /// key range conditions.
    pub fn query(&self, partition_value: &Attr, limit: Option<usize>) -> Result<Vec<Item>> {
        self.engine.query(&self.table, partition_value, limit)
    }

    /// Put a JSON object through the codec (floats become exact decimals).
    pub fn put_json(&self, value: &serde_json::Value) -> Result<()> {
        self.put(item_from_json(value)?)
    }

    /// Get and convert to JSON for presentation. Decimals come back as
    /// native numbers here; use [`get`](Self::get) for the exact form.
    pub fn get_json(&self, key: &Key) -> Result<Option<serde_json::Value>> {
        Ok(self.get(key)?.map(|item| item_to_json(&item)))
    }

    /// Update with JSON deltas through the codec.
    pub fn update_json(&self, key: &Key, deltas: &serde_json::Value) -> Result<()> {
        self.update(key, item_from_json(deltas)?)
    }
}
