pub mod fs;
pub mod memory;

use thiserror::Error;

pub use fs::FileStorage;
pub use memory::MemoryStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create store directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read store key '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove store key '{key}': {source}")]
    Remove {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid store key '{key}'")]
    InvalidKey { key: String },
}

/// String-valued key-value storage, the persistence seam for the catalog.
///
/// Reads report absence as `Ok(None)`; only real I/O failures are errors.
/// Writes are never silently dropped: a failed write must surface so the
/// caller can report it instead of pretending the mutation stuck.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}
