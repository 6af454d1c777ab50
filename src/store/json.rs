use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::core::participant::Directory;
use crate::store::{DirectoryStore, PairingStore, StoreError, TableSnapshot};
use crate::utils::validation::validate_filename;

pub const DIRECTORY_FILE: &str = "userdata.json";
pub const TABLE_FILE: &str = "pairings_full.json";
const ARCHIVE_PREFIX: &str = "pairings_full";

/// JSON snapshots kept side by side in one directory.
///
/// Every write goes to a temporary file in the same directory which is then
/// renamed over the target, so readers see either the old or the new
/// snapshot and never a partial one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn directory_path(&self) -> PathBuf {
        self.root.join(DIRECTORY_FILE)
    }

    pub fn table_path(&self) -> PathBuf {
        self.root.join(TABLE_FILE)
    }

    /// Path of the archive written for `date_key`
    pub fn archive_path(&self, date_key: &str) -> Result<PathBuf, StoreError> {
        if date_key.is_empty() {
            return Err(StoreError::InvalidKey(String::new()));
        }
        let name = format!("{ARCHIVE_PREFIX}{date_key}.json");
        let sanitized =
            validate_filename(&name).map_err(|_| StoreError::InvalidKey(date_key.to_string()))?;
        if sanitized != name {
            return Err(StoreError::InvalidKey(date_key.to_string()));
        }
        Ok(self.root.join(name))
    }

    fn read(&self, path: &Path, what: &'static str) -> Result<String, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(what)),
            Err(e) => Err(e.into()),
        }
    }

    fn replace(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Replaced snapshot");
        Ok(())
    }
}

impl DirectoryStore for JsonFileStore {
    fn get_snapshot(&self) -> Result<Directory, StoreError> {
        let content = self.read(&self.directory_path(), "directory")?;
        Ok(Directory::from_json(&content)?)
    }

    fn put_snapshot(&self, directory: &Directory) -> Result<(), StoreError> {
        self.replace(&self.directory_path(), &directory.to_json()?)
    }
}

impl PairingStore for JsonFileStore {
    fn load_table(&self) -> Result<TableSnapshot, StoreError> {
        let content = self.read(&self.table_path(), "pairing table")?;
        TableSnapshot::from_json(&content)
    }

    fn save_table(&self, table: &TableSnapshot) -> Result<(), StoreError> {
        self.replace(&self.table_path(), &table.to_json()?)
    }

    fn archive_table(&self, date_key: &str, table: &TableSnapshot) -> Result<(), StoreError> {
        let path = self.archive_path(date_key)?;
        self.replace(&path, &table.to_json()?)
    }
}
