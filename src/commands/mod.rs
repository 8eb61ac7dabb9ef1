pub(crate) mod app;
pub(crate) mod sections;

use crate::sections::Sections;
use crate::store::JsonFileStore;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// State shared by all commands. The store is only touched under the lock.
pub(crate) struct AppState {
    pub(crate) sections: Mutex<Sections<JsonFileStore>>,
    pub(crate) data_dir: PathBuf,
}

impl AppState {
    pub(crate) fn new(store: JsonFileStore, data_dir: PathBuf) -> Self {
        Self {
            sections: Mutex::new(Sections::new(store)),
            data_dir,
        }
    }

    pub(crate) fn sections(&self) -> Result<MutexGuard<'_, Sections<JsonFileStore>>, String> {
        self.sections
            .lock()
            .map_err(|_| "Section store is unavailable after an earlier failure.".to_string())
    }
}
