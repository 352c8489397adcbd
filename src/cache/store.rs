//! Cache Store Module
//!
//! Main cache engine: scalar and hash stores behind one read/write lock, with
//! lazy TTL expiration on read.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::trace;

use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheEntry, CacheStats, Expiry, Value};
use crate::config::Config;
use crate::error::Result;

/// Field name to entry mapping held under one hash key.
pub(crate) type Bucket = HashMap<String, CacheEntry>;

// == Stores ==
/// Both key namespaces, guarded together by the cache lock.
#[derive(Debug, Default)]
pub(crate) struct Stores {
    /// Scalar key-value storage
    pub scalars: HashMap<String, CacheEntry>,
    /// Hash key to bucket storage
    pub hashes: HashMap<String, Bucket>,
}

#[derive(Debug)]
pub(crate) struct Shared {
    pub stores: RwLock<Stores>,
    pub stats: StatsRecorder,
    pub prune_empty_buckets: bool,
}

// == Cache ==
/// Thread-safe in-process cache with scalar and hash entries.
///
/// `Cache` is a cheap handle: clones share the same storage, while every call to
/// [`Cache::new`] creates an independent instance. All operations are safe to
/// call concurrently without external synchronization.
///
/// # Example
/// ```
/// use swiftcache::{Cache, NO_EXPIRY};
///
/// let cache = Cache::new();
/// cache.set("name", "leoantony", NO_EXPIRY).unwrap();
/// assert_eq!(cache.get("name").unwrap().as_str(), Some("leoantony"));
/// assert!(cache.del("name"));
/// assert!(cache.get("name").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Cache {
    pub(crate) shared: Arc<Shared>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    // == Constructor ==
    /// Creates an empty cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates an empty cache from configuration.
    pub fn with_config(config: &Config) -> Self {
        Self {
            shared: Arc::new(Shared {
                stores: RwLock::new(Stores::default()),
                stats: StatsRecorder::default(),
                prune_empty_buckets: config.prune_empty_buckets,
            }),
        }
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous value and TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Time to live, `NO_EXPIRY` to keep the entry until deleted
    ///
    /// # Errors
    /// `InvalidArgument` if `ttl` is too large to represent; the store is unchanged.
    pub fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
        ttl: Duration,
    ) -> Result<()> {
        let mut stores = self.shared.stores.write();
        let entry = CacheEntry::new(value.into(), ttl, Instant::now())?;
        stores.scalars.insert(key.into(), entry);
        Ok(())
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// Returns None if the key is absent or expired. An expired entry found here
    /// is removed.
    pub fn get(&self, key: &str) -> Option<Value> {
        let (value, expired_at) = {
            let stores = self.shared.stores.read();
            let now = Instant::now();
            match stores.scalars.get(key) {
                Some(entry) if entry.is_live(now) => (Some(entry.value.clone()), None),
                Some(_) => (None, Some(now)),
                None => (None, None),
            }
        };

        self.shared.stats.record_lookup(value.is_some());
        if let Some(now) = expired_at {
            self.reclaim_scalar(key, now);
        }
        value
    }

    // == Exists ==
    /// Checks whether `key` holds a live entry.
    pub fn exists(&self, key: &str) -> bool {
        let (live, expired_at) = {
            let stores = self.shared.stores.read();
            let now = Instant::now();
            match stores.scalars.get(key) {
                Some(entry) if entry.is_live(now) => (true, None),
                Some(_) => (false, Some(now)),
                None => (false, None),
            }
        };

        self.shared.stats.record_lookup(live);
        if let Some(now) = expired_at {
            self.reclaim_scalar(key, now);
        }
        live
    }

    // == Delete ==
    /// Removes the entry under `key`, expired or not.
    ///
    /// Returns whether an entry was removed. Deleting an absent key is not an error.
    pub fn del(&self, key: &str) -> bool {
        self.shared.stores.write().scalars.remove(key).is_some()
    }

    // == Update ==
    /// Replaces the value of a live entry while keeping its original deadline.
    ///
    /// Returns false without creating anything if the key is absent or expired.
    pub fn update(&self, key: &str, value: impl Into<Value>) -> bool {
        let mut stores = self.shared.stores.write();
        let now = Instant::now();
        match stores.scalars.get_mut(key) {
            Some(entry) if entry.is_live(now) => {
                entry.value = value.into();
                true
            }
            Some(_) => {
                stores.scalars.remove(key);
                self.shared.stats.record_expired(1);
                trace!(key = %key, "reclaimed expired entry on update");
                false
            }
            None => false,
        }
    }

    // == All Data ==
    /// Returns a snapshot of every live scalar entry.
    ///
    /// The map is an independent copy; later writes to the cache do not affect it.
    pub fn all_data(&self) -> HashMap<String, Value> {
        let stores = self.shared.stores.read();
        let now = Instant::now();
        stores
            .scalars
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    // == Expires In ==
    /// Returns the remaining lifetime of `key`, or None if absent or expired.
    pub fn expires_in(&self, key: &str) -> Option<Expiry> {
        let stores = self.shared.stores.read();
        let now = Instant::now();
        stores.scalars.get(key).and_then(|entry| entry.expiry(now))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let stores = self.shared.stores.read();
        let hash_fields = stores.hashes.values().map(|bucket| bucket.len()).sum();
        self.shared
            .stats
            .snapshot(stores.scalars.len(), stores.hashes.len(), hash_fields)
    }

    // == Sweep Expired ==
    /// Removes every expired scalar entry and hash field.
    ///
    /// Returns the number of entries and fields removed. Sweeping only frees
    /// memory; it never changes what reads observe.
    pub fn sweep_expired(&self) -> usize {
        let mut stores = self.shared.stores.write();
        let now = Instant::now();

        let before = stores.scalars.len();
        stores.scalars.retain(|_, entry| entry.is_live(now));
        let mut removed = before - stores.scalars.len();

        for bucket in stores.hashes.values_mut() {
            let before = bucket.len();
            bucket.retain(|_, entry| entry.is_live(now));
            removed += before - bucket.len();
        }
        if self.shared.prune_empty_buckets {
            stores.hashes.retain(|_, bucket| !bucket.is_empty());
        }

        self.shared.stats.record_expired(removed);
        removed
    }

    /// Removes `key` if it is still expired as of `now`.
    ///
    /// Called after the read lock is released, so the entry may have been
    /// replaced in between; a fresh entry is left alone.
    fn reclaim_scalar(&self, key: &str, now: Instant) {
        let mut stores = self.shared.stores.write();
        if stores.scalars.get(key).is_some_and(|entry| entry.is_expired(now)) {
            stores.scalars.remove(key);
            self.shared.stats.record_expired(1);
            trace!(key = %key, "reclaimed expired entry on read");
        }
    }
}
