//! Local Record Store
//!
//! Device-scoped collection of normalized movie records. The whole collection lives as a
//! single JSON array under one well-known key of a [`StorageBackend`]; every append is a
//! read-modify-write of that array. Records are never updated or removed.
//!
//! Elements are decoded one at a time: an element that is not a record is skipped by readers
//! and carried through appends unchanged. Only a collection that is not an array at all is
//! treated as corrupt.

pub mod memory;
pub mod persistence;

pub use memory::MemoryBackend;
pub use persistence::SledBackend;

use crate::error::StorageError;
use crate::record::MovieRecord;
use parking_lot::Mutex;
use serde_json::value::RawValue;
use std::sync::Arc;
use tracing::{debug, warn};

/// Key under which the movie collection is stored
pub const MOVIES_KEY: &str = "reel.movies";

/// Byte-level key/value storage the record store is layered on
pub trait StorageBackend: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

/// Repository over the persisted movie collection
pub struct MovieStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
    write_lock: Mutex<()>,
}

impl MovieStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_key(backend, MOVIES_KEY)
    }

    /// Store whose collection lives under a custom key
    pub fn with_key(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// First record in insertion order with the given id.
    pub fn get(&self, id: &str) -> Result<Option<MovieRecord>, StorageError> {
        Ok(self.load_lenient()?.into_iter().find(|record| record.id == id))
    }

    pub fn contains(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.get(id)?.is_some())
    }

    /// Append a record to the collection.
    ///
    /// No uniqueness check happens here: appending an id that is already present stores a
    /// second copy which `get` will never return. Elements that do not decode as records are
    /// written back as they were read.
    pub fn append(&self, record: &MovieRecord) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();

        let mut elements = self.load_elements()?;
        elements.push(serde_json::value::to_raw_value(record)?);

        let bytes = serde_json::to_vec(&elements)?;
        self.backend.write(&self.key, &bytes)?;

        debug!(
            movie_id = %record.id,
            total = elements.len(),
            "Appended movie record"
        );
        Ok(())
    }

    /// All decodable records in insertion order
    pub fn list(&self) -> Result<Vec<MovieRecord>, StorageError> {
        self.load_lenient()
    }

    /// Decodable records plus a count of the elements that were skipped.
    ///
    /// Unlike [`MovieStore::list`], a collection that is not a JSON array is reported as
    /// [`StorageError::CorruptCollection`] instead of reading as empty.
    pub fn scan(&self) -> Result<CollectionScan, StorageError> {
        let elements = self.load_elements()?;
        let total = elements.len();
        let records = self.decode(elements);
        Ok(CollectionScan {
            skipped: total - records.len(),
            records,
        })
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.load_lenient()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Raw collection elements; empty when nothing (or `null`) has been written yet.
    fn load_elements(&self) -> Result<Vec<Box<RawValue>>, StorageError> {
        let Some(bytes) = self.backend.read(&self.key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_slice::<Option<Vec<Box<RawValue>>>>(&bytes)
            .map(Option::unwrap_or_default)
            .map_err(|e| StorageError::CorruptCollection {
                key: self.key.clone(),
                reason: e.to_string(),
            })
    }

    /// Decode each element on its own, skipping the ones that are not records.
    fn decode(&self, elements: Vec<Box<RawValue>>) -> Vec<MovieRecord> {
        elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| {
                serde_json::from_str::<MovieRecord>(element.get())
                    .map_err(|e| {
                        warn!(
                            key = %self.key,
                            index,
                            error = %e,
                            "Skipping undecodable movie record"
                        );
                    })
                    .ok()
            })
            .collect()
    }

    /// Decoded collection for readers; a corrupt collection reads as empty.
    fn load_lenient(&self) -> Result<Vec<MovieRecord>, StorageError> {
        match self.load_elements() {
            Ok(elements) => Ok(self.decode(elements)),
            Err(StorageError::CorruptCollection { key, reason }) => {
                warn!(key = %key, reason = %reason, "Ignoring corrupt movie collection");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Result of [`MovieStore::scan`]
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionScan {
    pub records: Vec<MovieRecord>,
    /// Elements that did not decode as movie records
    pub skipped: usize,
}
