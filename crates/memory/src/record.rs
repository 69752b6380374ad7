//! Memory record type and its item mapping
//!
//! A record is an ordinary item with a fixed minimal schema: generated
//! sortable id, full content, short summary, hashtags, and two timestamp
//! forms (ISO-8601 text for humans, epoch seconds for sort/filter).

use serde::{Deserialize, Serialize};

use stash_core::{Attr, Item, Number, Result, StashError};

/// Partition key attribute of the memory table.
pub const ID_ATTR: &str = "memory_id";

/// One stored memory.
///
/// Created only via [`MemoryStore::store`](crate::MemoryStore::store);
/// never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Generated id, lexicographically sortable by creation time.
    pub id: String,
    /// Full stored text.
    pub content: String,
    /// Short human-readable summary.
    pub tldr: String,
    /// Hashtags, each with its leading `#`.
    pub hashtags: Vec<String>,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
    /// Epoch seconds, used for sort and filter.
    pub timestamp: i64,
    /// Where the content came from, when it was fetched from a page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Free-form caller metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl MemoryRecord {
    /// Convert to the storage item form.
    pub fn to_item(&self) -> Result<Item> {
        let mut item = Item::new();
        item.insert(ID_ATTR.into(), Attr::from(self.id.clone()));
        item.insert("content".into(), Attr::from(self.content.clone()));
        item.insert("tldr".into(), Attr::from(self.tldr.clone()));
        item.insert(
            "hashtags".into(),
            Attr::L(self.hashtags.iter().map(|t| Attr::from(t.clone())).collect()),
        );
        item.insert("created_at".into(), Attr::from(self.created_at.clone()));
        item.insert(
            "timestamp".into(),
            Attr::from(Number::from_i64(self.timestamp)),
        );
        if let Some(url) = &self.source_url {
            item.insert("source_url".into(), Attr::from(url.clone()));
        }
        if let Some(metadata) = &self.metadata {
            item.insert("metadata".into(), Attr::from_json(metadata)?);
        }
        Ok(item)
    }

    /// Read a record back out of an item.
    ///
    /// The id is required; every other attribute falls back to its empty
    /// form, so records written by older shapes of the schema still load.
    pub fn from_item(item: &Item) -> Result<MemoryRecord> {
        let id = item
            .get(ID_ATTR)
            .and_then(Attr::as_s)
            .ok_or_else(|| StashError::validation("item has no memory_id attribute"))?
            .to_string();

        let text = |name: &str| {
            item.get(name)
                .and_then(Attr::as_s)
                .unwrap_or_default()
                .to_string()
        };

        let hashtags = item
            .get("hashtags")
            .and_then(Attr::as_l)
            .map(|tags| {
                tags.iter()
                    .filter_map(Attr::as_s)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(MemoryRecord {
            id,
            content: text("content"),
            tldr: text("tldr"),
            hashtags,
            created_at: text("created_at"),
            timestamp: item
                .get("timestamp")
                .and_then(Attr::as_n)
                .and_then(Number::as_i64)
                .unwrap_or_default(),
            source_url: item
                .get("source_url")
                .and_then(Attr::as_s)
                .map(str::to_string),
            metadata: item.get("metadata").map(Attr::to_json),
        })
    }
}
