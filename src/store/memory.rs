//! In-memory storage backend

use crate::error::StorageError;
use crate::store::StorageBackend;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local backend; contents vanish with the value
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
