//! Table descriptors and lifecycle status
//!
//! A table is identified by name and carries an immutable key schema:
//! exactly one partition key, at most one sort key, each typed string,
//! number, or binary. Lifecycle runs `Creating -> Active -> Deleting`;
//! the absent state is observable only as `TableNotFound`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StashError};
use crate::value::{Attr, Item, Key};

/// The type of a key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    String,
    Number,
    Binary,
}

impl KeyType {
    /// Whether a value matches this key type.
    pub fn matches(&self, attr: &Attr) -> bool {
        matches!(
            (self, attr),
            (KeyType::String, Attr::S(_))
                | (KeyType::Number, Attr::N(_))
                | (KeyType::Binary, Attr::B(_))
        )
    }
}

/// A key attribute definition (name + type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDefinition {
    pub name: String,
    pub key_type: KeyType,
}

impl KeyDefinition {
    pub fn new(name: impl Into<String>, key_type: KeyType) -> Self {
        Self {
            name: name.into(),
            key_type,
        }
    }
}

/// Ordered key attributes: one partition key, optionally one sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    pub partition: KeyDefinition,
    pub sort: Option<KeyDefinition>,
}

impl KeySchema {
    /// Partition-key-only schema.
    pub fn partition_only(name: impl Into<String>, key_type: KeyType) -> Self {
        Self {
            partition: KeyDefinition::new(name, key_type),
            sort: None,
        }
    }

    /// Composite partition + sort schema.
    pub fn composite(partition: KeyDefinition, sort: KeyDefinition) -> Self {
        Self {
            partition,
            sort: Some(sort),
        }
    }

    /// Validate that an item (or key) carries every key attribute with the
    /// declared type. Returns the violated constraint on failure.
    pub fn validate_key(&self, item: &Item) -> Result<()> {
        self.check_attr(&self.partition, item)?;
        if let Some(sort) = &self.sort {
            self.check_attr(sort, item)?;
        }
        Ok(())
    }

    /// Extract the key attributes out of a full item.
    pub fn key_of(&self, item: &Item) -> Result<Key> {
        self.validate_key(item)?;
        let mut key = Key::new();
        key.insert(
            self.partition.name.clone(),
            item[&self.partition.name].clone(),
        );
        if let Some(sort) = &self.sort {
            key.insert(sort.name.clone(), item[&sort.name].clone());
        }
        Ok(key)
    }

    fn check_attr(&self, def: &KeyDefinition, item: &Item) -> Result<()> {
        match item.get(&def.name) {
            None => Err(StashError::validation(format!(
                "missing key attribute '{}'",
                def.name
            ))),
            Some(attr) if !def.key_type.matches(attr) => Err(StashError::validation(format!(
                "key attribute '{}' has wrong type (expected {:?})",
                def.name, def.key_type
            ))),
            Some(_) => Ok(()),
        }
    }
}

/// Capacity/billing mode for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingMode {
    /// Pay-per-request, no provisioned units.
    OnDemand,
    /// Fixed read/write capacity units.
    Provisioned { read_units: u64, write_units: u64 },
}

impl Default for BillingMode {
    fn default() -> Self {
        BillingMode::OnDemand
    }
}

/// Everything needed to create a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub key_schema: KeySchema,
    pub billing: BillingMode,
}

impl TableSpec {
    /// On-demand table with a single string partition key — the common case.
    pub fn simple(name: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_schema: KeySchema::partition_only(partition_key, KeyType::String),
            billing: BillingMode::OnDemand,
        }
    }
}

/// Observable lifecycle status of a table.
///
/// The absent state has no variant; it is reported as `TableNotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStatus {
    Creating,
    Active,
    Deleting,
}

/// What describe reports: the spec plus current status and stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescription {
    pub spec: TableSpec,
    pub status: TableStatus,
    pub item_count: u64,
    pub created_at: DateTime<Utc>,
}
