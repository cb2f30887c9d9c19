//! Persistence layer for the movie record store

use crate::error::StorageError;
use crate::store::StorageBackend;
use std::path::Path;

/// Sled-based storage backend
pub struct SledBackend {
    db: sled::Db,
}

impl SledBackend {
    /// Open (or create) a sled database at the given directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            StorageError::Backend(format!(
                "Failed to open sled database at {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(Self { db })
    }

    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }

    /// Get the underlying sled database
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db
            .flush()
            .map_err(|e| StorageError::Backend(format!("Failed to flush database: {}", e)))?;
        Ok(())
    }
}

impl StorageBackend for SledBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let value = self
            .db
            .get(key.as_bytes())
            .map_err(|e| StorageError::Backend(format!("Failed to read '{}': {}", key, e)))?;
        Ok(value.map(|bytes| bytes.to_vec()))
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.db
            .insert(key.as_bytes(), value)
            .map_err(|e| StorageError::Backend(format!("Failed to write '{}': {}", key, e)))?;
        // Durable once write returns
        self.flush()
    }
}
