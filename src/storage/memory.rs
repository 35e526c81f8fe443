use std::collections::HashMap;

use super::{KeyValueStorage, StorageError};

// In-memory storage for tests and hosts that want nothing on disk.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaves_like_a_string_map() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get("products").unwrap().is_none());
        storage.set("products", "[]").unwrap();
        assert_eq!(storage.get("products").unwrap().as_deref(), Some("[]"));
        storage.remove("products").unwrap();
        assert!(storage.get("products").unwrap().is_none());
    }
}
