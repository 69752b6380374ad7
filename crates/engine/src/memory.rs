//! In-process storage engine
//!
//! DashMap of tables, per-table RwLock around an ordered item map. Table
//! creation and deletion are modeled asynchronously: each transition is
//! stamped with an activation instant and observed lazily on the next call,
//! so callers polling describe see `Creating` become `Active` (and
//! `Deleting` become absent) the way they would against a remote engine.
//!
//! # Thread Safety
//!
//! All operations are thread-safe. Two concurrent puts to the same key race
//! per the write lock's acquisition order; last applied wins. Concurrent
//! create_table calls for one name are serialized by the DashMap entry, so
//! exactly one wins and the rest observe `TableAlreadyExists`.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;

use stash_core::{
    Attr, Item, Key, KeySchema, Result, StashError, TableDescription, TableSpec, TableStatus,
};

use crate::{ScanFilter, StorageEngine};

/// Lifecycle state with the instant at which the pending transition lands.
enum Lifecycle {
    Creating { active_at: Instant },
    Active,
    Deleting { gone_at: Instant },
}

struct Table {
    spec: TableSpec,
    created_at: DateTime<Utc>,
    state: RwLock<Lifecycle>,
    items: RwLock<BTreeMap<Vec<u8>, Item>>,
}

/// In-process engine implementing [`StorageEngine`].
pub struct MemoryEngine {
    tables: DashMap<String, Table>,
    /// How long Creating/Deleting linger before the transition is observable.
    activation_delay: Duration,
}

impl MemoryEngine {
    /// Engine whose lifecycle transitions land immediately.
    pub fn new() -> Self {
        Self::with_activation_delay(Duration::ZERO)
    }

    /// Engine whose tables stay `Creating`/`Deleting` for `delay` before
    /// the transition is observable. Lets tests exercise the poll loop.
    pub fn with_activation_delay(delay: Duration) -> Self {
        Self {
            tables: DashMap::new(),
            activation_delay: delay,
        }
    }

    /// Observe any pending lifecycle transition for a table.
    fn advance(&self, name: &str) {
        let mut remove = false;
        if let Some(table) = self.tables.get(name) {
            let mut state = table.state.write();
            match *state {
                Lifecycle::Creating { active_at } if Instant::now() >= active_at => {
                    *state = Lifecycle::Active;
                }
                Lifecycle::Deleting { gone_at } if Instant::now() >= gone_at => {
                    remove = true;
                }
                _ => {}
            }
        }
        if remove {
            self.tables.remove(name);
            tracing::debug!(table = %name, "table deletion completed");
        }
    }

    /// Run `f` against an Active table; anything else is `TableNotFound`.
    fn with_active<T>(&self, name: &str, f: impl FnOnce(&Table) -> Result<T>) -> Result<T> {
        self.advance(name);
        let table = self.tables.get(name).ok_or_else(|| StashError::TableNotFound {
            table: name.to_string(),
        })?;
        if !matches!(*table.state.read(), Lifecycle::Active) {
            return Err(StashError::TableNotFound {
                table: name.to_string(),
            });
        }
        f(&table)
    }

    fn describe_inner(table: &Table) -> TableDescription {
        let status = match *table.state.read() {
            Lifecycle::Creating { .. } => TableStatus::Creating,
            Lifecycle::Active => TableStatus::Active,
            Lifecycle::Deleting { .. } => TableStatus::Deleting,
        };
        TableDescription {
            spec: table.spec.clone(),
            status,
            item_count: table.items.read().len() as u64,
            created_at: table.created_at,
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a validated key into the table's ordered map key.
///
/// Length-prefixed partition bytes followed by sort bytes, so composite
/// keys never collide across attribute boundaries.
fn encode_key(schema: &KeySchema, key: &Key) -> Result<Vec<u8>> {
    schema.validate_key(key)?;
    let mut out = Vec::new();
    push_attr(&mut out, &key[&schema.partition.name])?;
    if let Some(sort) = &schema.sort {
        push_attr(&mut out, &key[&sort.name])?;
    }
    Ok(out)
}

fn push_attr(out: &mut Vec<u8>, attr: &Attr) -> Result<()> {
    let bytes: &[u8] = match attr {
        Attr::S(s) => s.as_bytes(),
        Attr::N(n) => n.as_str().as_bytes(),
        Attr::B(b) => b,
        other => {
            return Err(StashError::validation(format!(
                "key attributes must be string, number, or binary, got {:?}",
                other
            )))
        }
    };
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

impl StorageEngine for MemoryEngine {
    fn create_table(&self, spec: &TableSpec) -> Result<TableDescription> {
        self.advance(&spec.name);
        match self.tables.entry(spec.name.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StashError::TableAlreadyExists {
                table: spec.name.clone(),
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let table = Table {
                    spec: spec.clone(),
                    created_at: Utc::now(),
                    state: RwLock::new(Lifecycle::Creating {
                        active_at: Instant::now() + self.activation_delay,
                    }),
                    items: RwLock::new(BTreeMap::new()),
                };
                let description = Self::describe_inner(&table);
                slot.insert(table);
                tracing::info!(table = %spec.name, "table creation started");
                Ok(description)
            }
        }
    }

    fn delete_table(&self, name: &str) -> Result<TableDescription> {
        self.advance(name);
        let table = self.tables.get(name).ok_or_else(|| StashError::TableNotFound {
            table: name.to_string(),
        })?;
        *table.state.write() = Lifecycle::Deleting {
            gone_at: Instant::now() + self.activation_delay,
        };
        tracing::info!(table = %name, "table deletion started");
        Ok(Self::describe_inner(&table))
    }

    fn describe_table(&self, name: &str) -> Result<TableDescription> {
        self.advance(name);
        let table = self.tables.get(name).ok_or_else(|| StashError::TableNotFound {
            table: name.to_string(),
        })?;
        Ok(Self::describe_inner(&table))
    }

    fn list_tables(&self) -> Result<Vec<String>> {
        let names: Vec<String> = self.tables.iter().map(|t| t.key().clone()).collect();
        for name in &names {
            self.advance(name);
        }
        let mut remaining: Vec<String> = self.tables.iter().map(|t| t.key().clone()).collect();
        remaining.sort();
        Ok(remaining)
    }

    fn put_item(&self, table: &str, item: Item) -> Result<()> {
        self.with_active(table, |t| {
            let encoded = encode_key(&t.spec.key_schema, &item)?;
            t.items.write().insert(encoded, item);
            Ok(())
        })
    }

    fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        self.with_active(table, |t| {
            let encoded = encode_key(&t.spec.key_schema, key)?;
            Ok(t.items.read().get(&encoded).cloned())
        })
    }

    fn update_item(&self, table: &str, key: &Key, deltas: Item) -> Result<()> {
        self.with_active(table, |t| {
            let schema = &t.spec.key_schema;
            // Key attributes are immutable; rewriting one would move the item
            if deltas.contains_key(&schema.partition.name)
                || schema
                    .sort
                    .as_ref()
                    .map(|s| deltas.contains_key(&s.name))
                    .unwrap_or(false)
            {
                return Err(StashError::validation(
                    "update deltas must not name key attributes",
                ));
            }
            let encoded = encode_key(schema, key)?;
            let mut items = t.items.write();
            match items.get_mut(&encoded) {
                Some(existing) => {
                    existing.extend(deltas);
                }
                None => {
                    // Upsert: absent items are created from key + deltas
                    let mut item = key.clone();
                    item.extend(deltas);
                    items.insert(encoded, item);
                }
            }
            Ok(())
        })
    }

    fn delete_item(&self, table: &str, key: &Key) -> Result<()> {
        self.with_active(table, |t| {
            let encoded = encode_key(&t.spec.key_schema, key)?;
            t.items.write().remove(&encoded);
            Ok(())
        })
    }

    fn scan(
        &self,
        table: &str,
        limit: Option<usize>,
        filter: Option<&ScanFilter>,
    ) -> Result<Vec<Item>> {
        self.with_active(table, |t| {
            let items = t.items.read();
            let mut out = Vec::new();
            for item in items.values() {
                if limit.map(|l| out.len() >= l).unwrap_or(false) {
                    break;
                }
                if let Some(f) = filter {
                    if !f.matches(item) {
                        continue;
                    }
                }
                out.push(item.clone());
            }
            Ok(out)
        })
    }

    fn query(
        &self,
        table: &str,
        partition_value: &Attr,
        limit: Option<usize>,
    ) -> Result<Vec<Item>> {
        self.with_active(table, |t| {
            let partition = &t.spec.key_schema.partition;
            if !partition.key_type.matches(partition_value) {
                return Err(StashError::validation(format!(
                    "partition value has wrong type for '{}'",
                    partition.name
                )));
            }
            let items = t.items.read();
            let mut out = Vec::new();
            for item in items.values() {
                if limit.map(|l| out.len() >= l).unwrap_or(false) {
                    break;
                }
                if item.get(&partition.name) == Some(partition_value) {
                    out.push(item.clone());
                }
            }
            Ok(out)
        })
    }
}
