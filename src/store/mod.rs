//! Whole-snapshot persistence for the participant directory and pairing table.
//!
//! The engine only ever fetches an entire snapshot or replaces an entire
//! snapshot. Two adapters are provided:
//!
//! - [`JsonFileStore`]: JSON blobs in one directory, replaced atomically
//! - [`MemoryStore`]: in-process, for tests and embedding
//!
//! Neither adapter offers compare-and-swap. Callers must make sure only one
//! pairing-and-persist cycle runs against a store at a time.

pub mod json;
pub mod memory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::participant::Directory;
use crate::core::pairing::PairingTable;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to replace snapshot: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("No {0} snapshot in store")]
    NotFound(&'static str),

    #[error("Invalid archive key '{0}'")]
    InvalidKey(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Table snapshot version for compatibility checking
pub const TABLE_VERSION: &str = "1.0.0";

/// Serializable pairing table envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub version: String,
    pub created_at: String,

    /// Digest of the inputs that produced the table; absent for tables that
    /// were imported rather than generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    pub rows: PairingTable,
}

impl TableSnapshot {
    pub fn new(rows: PairingTable, fingerprint: Option<String>) -> Self {
        Self {
            version: TABLE_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            fingerprint,
            rows,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let snapshot: Self = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if snapshot.version != TABLE_VERSION {
            tracing::warn!(
                expected = TABLE_VERSION,
                found = %snapshot.version,
                "Pairing table version mismatch"
            );
        }

        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Source and sink for the participant directory
pub trait DirectoryStore {
    /// Fetch the entire current directory
    fn get_snapshot(&self) -> Result<Directory, StoreError>;

    /// Replace the entire directory
    fn put_snapshot(&self, directory: &Directory) -> Result<(), StoreError>;
}

/// Source and sink for the current pairing table and its published archives
pub trait PairingStore {
    fn load_table(&self) -> Result<TableSnapshot, StoreError>;

    fn save_table(&self, table: &TableSnapshot) -> Result<(), StoreError>;

    /// Keep a copy of a published table under its meeting date
    fn archive_table(&self, date_key: &str, table: &TableSnapshot) -> Result<(), StoreError>;
}
