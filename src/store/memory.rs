use super::{EntryRecord, MetaStore};
use crate::error::StoreError;
use crate::models::EntryId;
use std::collections::BTreeMap;

/// Volatile store, used for previews and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<EntryId, EntryRecord>,
    last_id: EntryId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetaStore for MemoryStore {
    fn create_entry(&mut self) -> Result<EntryId, StoreError> {
        self.last_id += 1;
        self.entries.insert(self.last_id, EntryRecord::new());
        Ok(self.last_id)
    }

    fn delete_entry(&mut self, id: EntryId) -> Result<bool, StoreError> {
        Ok(self.entries.remove(&id).is_some())
    }

    fn entry_ids(&self) -> Result<Vec<EntryId>, StoreError> {
        Ok(self.entries.keys().copied().collect())
    }

    fn get(&self, id: EntryId, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .get(&id)
            .and_then(|record| record.meta.get(key))
            .cloned())
    }

    fn set(&mut self, id: EntryId, key: &str, value: &str) -> Result<(), StoreError> {
        let record = self
            .entries
            .get_mut(&id)
            .ok_or(StoreError::MissingEntry(id))?;
        record.set(key, value);
        Ok(())
    }

    fn updated_at(&self, id: EntryId) -> Result<Option<i64>, StoreError> {
        Ok(self.entries.get(&id).map(|record| record.updated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::IMAGE_KEY;

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = MemoryStore::new();
        let first = store.create_entry().expect("create");
        let second = store.create_entry().expect("create");
        assert!(store.delete_entry(second).expect("delete"));

        let third = store.create_entry().expect("create");
        assert!(third > second);
        assert_eq!(store.entry_ids().expect("ids"), vec![first, third]);
    }

    #[test]
    fn set_replaces_values_and_requires_entry() {
        let mut store = MemoryStore::new();
        let id = store.create_entry().expect("create");

        assert_eq!(store.get(id, IMAGE_KEY).expect("get"), None);
        store.set(id, IMAGE_KEY, "a").expect("set");
        store.set(id, IMAGE_KEY, "b").expect("set");
        assert_eq!(store.get(id, IMAGE_KEY).expect("get").as_deref(), Some("b"));

        assert!(matches!(
            store.set(99, IMAGE_KEY, "c"),
            Err(StoreError::MissingEntry(99))
        ));
        assert!(!store.delete_entry(99).expect("delete"));
    }
}
