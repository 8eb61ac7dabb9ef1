use super::{EntryRecord, MetaStore};
use crate::error::StoreError;
use crate::models::EntryId;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Store keeping one JSON file per entry under `<data_dir>/sections/`.
///
/// Records are written to a temporary file and renamed into place, so a
/// reader sees either the old or the new record, never a partial one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl JsonFileStore {
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let root = data_dir.join("sections");
        fs::create_dir_all(&root).map_err(io_error(&root))?;
        log::info!("section store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: EntryId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    fn sequence_path(&self) -> PathBuf {
        self.root.join("sequence")
    }

    fn read_record(&self, id: EntryId) -> Result<Option<EntryRecord>, StoreError> {
        let path = self.record_path(id);
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)
                .map(Some)
                .map_err(|source| StoreError::Corrupt { path, source }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, content).map_err(io_error(&tmp))?;
        fs::rename(&tmp, path).map_err(io_error(path))
    }

    fn write_record(&self, id: EntryId, record: &EntryRecord) -> Result<(), StoreError> {
        let path = self.record_path(id);
        let content = serde_json::to_string_pretty(record).map_err(|source| {
            StoreError::Serialize {
                path: path.clone(),
                source,
            }
        })?;
        self.write_atomic(&path, &content)
    }

    fn last_issued_id(&self) -> Result<EntryId, StoreError> {
        let path = self.sequence_path();
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content.trim().parse().unwrap_or(0)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}

impl MetaStore for JsonFileStore {
    fn create_entry(&mut self) -> Result<EntryId, StoreError> {
        let highest = self.entry_ids()?.last().copied().unwrap_or(0);
        let id = self.last_issued_id()?.max(highest) + 1;

        self.write_record(id, &EntryRecord::new())?;
        self.write_atomic(&self.sequence_path(), &id.to_string())?;

        log::info!("created section {}", id);
        Ok(id)
    }

    fn delete_entry(&mut self, id: EntryId) -> Result<bool, StoreError> {
        let path = self.record_path(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("deleted section {}", id);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn entry_ids(&self) -> Result<Vec<EntryId>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(io_error(&self.root))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error(&self.root))?;
            let name = entry.file_name();
            let id = name
                .to_str()
                .and_then(|name| name.strip_suffix(".json"))
                .and_then(|stem| stem.parse::<EntryId>().ok());
            if let Some(id) = id.filter(|id| *id > 0) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn get(&self, id: EntryId, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .read_record(id)?
            .and_then(|mut record| record.meta.remove(key)))
    }

    fn set(&mut self, id: EntryId, key: &str, value: &str) -> Result<(), StoreError> {
        let mut record = self.read_record(id)?.ok_or(StoreError::MissingEntry(id))?;
        record.set(key, value);
        self.write_record(id, &record)?;
        log::debug!("section {}: wrote {}", id, key);
        Ok(())
    }

    fn updated_at(&self, id: EntryId) -> Result<Option<i64>, StoreError> {
        Ok(self.read_record(id)?.map(|record| record.updated_at))
    }
}
