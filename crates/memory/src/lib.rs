//! Memory record layer
//!
//! Composes the table manager and item store: generates sortable record
//! ids, pulls URLs out of free text, and provides hashtag discovery over
//! the whole record population via scan.

pub mod record;

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use stash_core::{Result, StoreConfig, TableSpec};
use stash_engine::StorageEngine;
use stash_store::{ItemStore, TableManager};

pub use record::{MemoryRecord, ID_ATTR};

/// Absolute http(s) URLs; everything up to whitespace or URL-hostile
/// punctuation.
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).expect("url pattern compiles"));

/// Last issued id timestamp in microseconds, process-wide. Sequential calls
/// in the same microsecond bump past it instead of colliding.
static LAST_ID_MICROS: AtomicI64 = AtomicI64::new(0);

/// Extract absolute http(s) URLs from free text.
///
/// First-occurrence order, duplicates preserved; empty when none match.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Generate a fresh record id: `mem_` + UTC time to microsecond precision.
///
/// Monotonic for sequential calls within one process. Across processes the
/// clock is the only ordering, so rapid parallel writers can collide at
/// microsecond resolution — a known limit of the id scheme.
pub fn generate_id() -> String {
    let now = Utc::now().timestamp_micros();
    // fetch_update yields the previous value; the issued stamp is what got
    // stored in its place
    let issued = LAST_ID_MICROS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .map(|previous| now.max(previous + 1))
        .unwrap_or(now);
    let stamp = Utc
        .timestamp_micros(issued)
        .single()
        .unwrap_or_else(Utc::now);
    format_id(stamp)
}

fn format_id(at: DateTime<Utc>) -> String {
    format!("mem_{}", at.format("%Y%m%d_%H%M%S_%6f"))
}

/// Normalize a hashtag query to its stored leading-`#` lowercase form.
fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim();
    if tag.starts_with('#') {
        tag.to_lowercase()
    } else {
        format!("#{}", tag.to_lowercase())
    }
}

/// Append-only memory records over the configured table.
///
/// Writes go through ensure_exists first, so the table is created on the
/// first store. Stores are not idempotent under retry: every call mints a
/// fresh id.
#[derive(Clone)]
pub struct MemoryStore {
    tables: TableManager,
    items: ItemStore,
    spec: TableSpec,
}

impl MemoryStore {
    /// Memory store over the engine, using the configured table name and
    /// create-timeout ceiling.
    pub fn new(engine: Arc<dyn StorageEngine>, config: &StoreConfig) -> Self {
        let spec = TableSpec::simple(&config.memory_table, ID_ATTR);
        Self {
            tables: TableManager::new(engine.clone()).with_create_timeout(config.create_timeout),
            items: ItemStore::new(engine, &config.memory_table),
            spec,
        }
    }

    /// Create the memory table if absent and wait until it is active.
    pub fn ensure_table(&self) -> Result<()> {
        self.tables.ensure_exists(&self.spec)?;
        Ok(())
    }

    /// Store a new memory record; returns its generated id.
    pub fn store(
        &self,
        content: impl Into<String>,
        tldr: impl Into<String>,
        hashtags: Vec<String>,
        source_url: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> Result<String> {
        self.ensure_table()?;

        let now = Utc::now();
        let record = MemoryRecord {
            id: generate_id(),
            content: content.into(),
            tldr: tldr.into(),
            hashtags,
            created_at: now.to_rfc3339(),
            timestamp: now.timestamp(),
            source_url,
            metadata,
        };
        self.items.put(record.to_item()?)?;
        tracing::info!(id = %record.id, "memory stored");
        Ok(record.id)
    }

    /// The most recent records from one scan page, newest first.
    ///
    /// Sorts only the page the scan returned, so when the table holds more
    /// items than a single page this is not a global most-recent-N. That
    /// matches the layer's intended usage; a true global answer would need
    /// full pagination.
    pub fn recent(&self, limit: usize) -> Result<Vec<MemoryRecord>> {
        let items = self.items.scan(Some(limit), None)?;
        let mut records: Vec<MemoryRecord> = items
            .iter()
            .map(MemoryRecord::from_item)
            .collect::<Result<_>>()?;
        records.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    /// All records carrying the hashtag, matched case-insensitively with or
    /// without the `#` prefix in the query.
    ///
    /// Walks the entire table per search — O(table size) by design; the
    /// backing scan is assumed cheap at this layer's expected table sizes.
    pub fn search_hashtag(&self, tag: &str) -> Result<Vec<MemoryRecord>> {
        let wanted = normalize_tag(tag);
        let items = self.items.scan(None, None)?;
        items
            .iter()
            .map(MemoryRecord::from_item)
            .filter(|record| match record {
                Ok(r) => r.hashtags.iter().any(|t| t.to_lowercase() == wanted),
                Err(_) => true,
            })
            .collect()
    }

    /// Fetch one record by id.
    pub fn get(&self, id: &str) -> Result<Option<MemoryRecord>> {
        let mut key = stash_core::Key::new();
        key.insert(ID_ATTR.into(), stash_core::Attr::from(id));
        match self.items.get(&key)? {
            Some(item) => Ok(Some(MemoryRecord::from_item(&item)?)),
            None => Ok(None),
        }
    }
}
