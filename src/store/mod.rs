//! Per-entry key-value persistence.
//!
//! Each hotspot section is one entry; its image, hotspot blob and title are
//! string values under fixed keys. Writes replace whole values, so the last
//! save wins.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::EntryId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Background image URL of a section.
pub const IMAGE_KEY: &str = "hotspot_image";
/// Serialized hotspot list of a section.
pub const SPOTS_KEY: &str = "hotspot_spots";
/// Human label of a section.
pub const TITLE_KEY: &str = "section_title";

pub trait MetaStore {
    /// Creates an empty entry and returns its new, never reused id.
    fn create_entry(&mut self) -> Result<EntryId, StoreError>;

    /// Removes an entry with all its values. Returns false if it did not exist.
    fn delete_entry(&mut self, id: EntryId) -> Result<bool, StoreError>;

    /// All existing entry ids in ascending order.
    fn entry_ids(&self) -> Result<Vec<EntryId>, StoreError>;

    fn get(&self, id: EntryId, key: &str) -> Result<Option<String>, StoreError>;

    /// Fails with [`StoreError::MissingEntry`] if the entry does not exist.
    fn set(&mut self, id: EntryId, key: &str, value: &str) -> Result<(), StoreError>;

    /// Last modification time in milliseconds since the Unix epoch.
    fn updated_at(&self, id: EntryId) -> Result<Option<i64>, StoreError>;
}

/// Stored form of one entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntryRecord {
    pub(crate) created_at: i64,
    pub(crate) updated_at: i64,

    #[serde(default)]
    pub(crate) meta: BTreeMap<String, String>,
}

impl EntryRecord {
    pub(crate) fn new() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            created_at: now,
            updated_at: now,
            meta: BTreeMap::new(),
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &str) {
        self.meta.insert(key.to_string(), value.to_string());
        // Never move backwards, even if the clock does.
        self.updated_at = chrono::Utc::now()
            .timestamp_millis()
            .max(self.updated_at);
    }
}
