//! Movie Resolver
//!
//! Decides between the local record store and the provider for a movie identifier:
//! stored records are returned as-is, misses are fetched, normalized, persisted when
//! complete, and returned.
//!
//! The store check and the store write are separated by the provider fetch. Two resolutions
//! of the same id running at once would both miss and both fetch, so by default the resolver
//! keeps an in-flight table keyed by id: the first resolution leads the fetch, later ones
//! wait on a oneshot channel for the leader's record. With `dedupe_in_flight = false` every
//! resolution fetches independently, which is how the record store can end up holding the
//! same id twice.

use crate::normalize::{normalize_response, RawMovieEnvelope};
use crate::provider::MovieProvider;
use crate::record::MovieRecord;
use crate::store::MovieStore;
use futures::future::join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Coalesce concurrent resolutions of the same id into a single fetch
    #[serde(default = "default_true")]
    pub dedupe_in_flight: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            dedupe_in_flight: default_true(),
        }
    }
}

#[derive(Debug, Default)]
struct InFlightEntry {
    /// Resolutions currently fetching this id
    leaders: usize,
    waiters: Vec<oneshot::Sender<MovieRecord>>,
}

type InFlightTable = Arc<Mutex<HashMap<String, InFlightEntry>>>;

/// A resolution's claim on an id in the in-flight table.
///
/// Dropping an unfinished slot (the resolve future was cancelled) releases the claim and
/// drops the waiters' senders, so followers retry on their own.
struct InFlightSlot {
    table: InFlightTable,
    id: String,
    released: bool,
}

impl InFlightSlot {
    fn complete(mut self, record: &MovieRecord) {
        for waiter in self.release() {
            let _ = waiter.send(record.clone());
        }
    }

    fn release(&mut self) -> Vec<oneshot::Sender<MovieRecord>> {
        self.released = true;
        let mut table = self.table.lock();
        let Some(entry) = table.get_mut(&self.id) else {
            return Vec::new();
        };
        entry.leaders = entry.leaders.saturating_sub(1);
        if entry.leaders > 0 {
            return Vec::new();
        }
        table
            .remove(&self.id)
            .map(|entry| entry.waiters)
            .unwrap_or_default()
    }
}

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        if !self.released {
            debug!(movie_id = %self.id, "Resolution dropped before completion");
            drop(self.release());
        }
    }
}

enum Claim {
    Lead(InFlightSlot),
    Follow(oneshot::Receiver<MovieRecord>),
}

/// Cache-first movie resolver
pub struct MovieResolver {
    store: Arc<MovieStore>,
    provider: Arc<dyn MovieProvider>,
    config: ResolverConfig,
    in_flight: InFlightTable,
}

impl MovieResolver {
    pub fn new(store: Arc<MovieStore>, provider: Arc<dyn MovieProvider>) -> Self {
        Self::with_config(store, provider, ResolverConfig::default())
    }

    pub fn with_config(
        store: Arc<MovieStore>,
        provider: Arc<dyn MovieProvider>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            store,
            provider,
            config,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn store(&self) -> &MovieStore {
        &self.store
    }

    /// Resolve a movie record, preferring the local store.
    ///
    /// Never fails: provider and storage problems are logged and yield a record with
    /// whatever could be determined, possibly just the id.
    pub async fn resolve(&self, id: &str) -> MovieRecord {
        loop {
            if let Some(record) = self.lookup(id) {
                debug!(movie_id = %id, "Movie record cache hit");
                return record;
            }

            match self.claim(id) {
                Claim::Lead(slot) => {
                    debug!(movie_id = %id, "Movie record cache miss");
                    let record = self.fetch_and_store(id).await;
                    slot.complete(&record);
                    return record;
                }
                Claim::Follow(receiver) => match receiver.await {
                    Ok(record) => {
                        debug!(movie_id = %id, "Joined in-flight resolution");
                        return record;
                    }
                    Err(_) => {
                        debug!(movie_id = %id, "In-flight resolution abandoned, retrying");
                    }
                },
            }
        }
    }

    /// Resolve several ids concurrently; results keep the input order.
    pub async fn resolve_many<S: AsRef<str>>(&self, ids: &[S]) -> Vec<MovieRecord> {
        join_all(ids.iter().map(|id| self.resolve(id.as_ref()))).await
    }

    /// Whether a fetch for `id` is currently outstanding
    pub fn is_resolving(&self, id: &str) -> bool {
        self.in_flight.lock().contains_key(id)
    }

    /// Ids with an outstanding fetch, sorted
    pub fn in_flight(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.in_flight.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn lookup(&self, id: &str) -> Option<MovieRecord> {
        match self.store.get(id) {
            Ok(record) => record,
            Err(e) => {
                warn!(movie_id = %id, error = %e, "Record store read failed, treating as miss");
                None
            }
        }
    }

    fn claim(&self, id: &str) -> Claim {
        let mut table = self.in_flight.lock();
        let entry = table.entry(id.to_string()).or_default();

        if self.config.dedupe_in_flight && entry.leaders > 0 {
            let (tx, rx) = oneshot::channel();
            entry.waiters.push(tx);
            return Claim::Follow(rx);
        }

        entry.leaders += 1;
        Claim::Lead(InFlightSlot {
            table: Arc::clone(&self.in_flight),
            id: id.to_string(),
            released: false,
        })
    }

    async fn fetch_and_store(&self, id: &str) -> MovieRecord {
        let envelope = match self.provider.fetch_movie(id).await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    movie_id = %id,
                    provider = %self.provider.provider_name(),
                    error = %e,
                    "Provider fetch failed, treating as empty response"
                );
                RawMovieEnvelope::default()
            }
        };

        let record = normalize_response(&envelope, id);
        if !record.is_complete() {
            warn!(movie_id = %id, "Movie record has no title, not persisting");
            return record;
        }

        match self.store.contains(id) {
            Ok(true) => {
                debug!(movie_id = %id, "Movie already stored by another resolution");
            }
            Ok(false) => match self.store.append(&record) {
                Ok(()) => info!(movie_id = %id, title = ?record.title, "Stored movie record"),
                Err(e) => warn!(movie_id = %id, error = %e, "Failed to store movie record"),
            },
            Err(e) => {
                warn!(movie_id = %id, error = %e, "Record store re-check failed, not persisting");
            }
        }

        record
    }
}
