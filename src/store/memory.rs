use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::core::participant::Directory;
use crate::store::{DirectoryStore, PairingStore, StoreError, TableSnapshot};

#[derive(Debug, Default)]
struct Inner {
    directory: Option<Directory>,
    table: Option<TableSnapshot>,
    archives: BTreeMap<String, TableSnapshot>,
}

/// In-process store holding cloned snapshots
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(directory: Directory) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.lock() {
            inner.directory = Some(directory);
        }
        store
    }

    pub fn archive(&self, date_key: &str) -> Result<Option<TableSnapshot>, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.archives.get(date_key).cloned())
    }
}

impl DirectoryStore for MemoryStore {
    fn get_snapshot(&self) -> Result<Directory, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.directory.clone().ok_or(StoreError::NotFound("directory"))
    }

    fn put_snapshot(&self, directory: &Directory) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.directory = Some(directory.clone());
        Ok(())
    }
}

impl PairingStore for MemoryStore {
    fn load_table(&self) -> Result<TableSnapshot, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.table.clone().ok_or(StoreError::NotFound("pairing table"))
    }

    fn save_table(&self, table: &TableSnapshot) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.table = Some(table.clone());
        Ok(())
    }

    fn archive_table(&self, date_key: &str, table: &TableSnapshot) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.archives.insert(date_key.to_string(), table.clone());
        Ok(())
    }
}
