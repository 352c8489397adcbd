//! Hash Store Module
//!
//! Field/value buckets under one key, each field carrying its own TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::entry::deadline;
use crate::cache::{Cache, CacheEntry, Record, Value};
use crate::error::Result;

/// Outcome of looking up one field under the read lock.
enum FieldLookup<T> {
    Live(T),
    Expired(Instant),
    Missing,
}

impl Cache {
    // == Hset ==
    /// Stores `value` in `field` of the bucket under `key`, creating the bucket if needed.
    ///
    /// The TTL applies to this field only; other fields of the bucket keep their own.
    ///
    /// # Errors
    /// `InvalidArgument` if `ttl` is too large to represent; the bucket is unchanged.
    pub fn hset(
        &self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
        ttl: Duration,
    ) -> Result<()> {
        let mut stores = self.shared.stores.write();
        let entry = CacheEntry::new(value.into(), ttl, Instant::now())?;
        stores
            .hashes
            .entry(key.into())
            .or_default()
            .insert(field.into(), entry);
        Ok(())
    }

    // == HGet ==
    /// Retrieves a copy of one field's value.
    ///
    /// Returns None if the bucket or field is absent, or the field has expired.
    pub fn hget(&self, key: &str, field: &str) -> Option<Value> {
        match self.lookup_field(key, field, |entry| entry.value.clone()) {
            FieldLookup::Live(value) => Some(value),
            FieldLookup::Expired(_) | FieldLookup::Missing => None,
        }
    }

    // == HExists ==
    /// Checks whether `field` of the bucket under `key` is live.
    pub fn hexists(&self, key: &str, field: &str) -> bool {
        matches!(self.lookup_field(key, field, |_| ()), FieldLookup::Live(()))
    }

    // == HGetAll ==
    /// Returns a snapshot of every live field of the bucket under `key`.
    ///
    /// An absent or fully expired bucket yields an empty map.
    pub fn hget_all(&self, key: &str) -> HashMap<String, Value> {
        let stores = self.shared.stores.read();
        let now = Instant::now();
        stores
            .hashes
            .get(key)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|(_, entry)| entry.is_live(now))
                    .map(|(field, entry)| (field.clone(), entry.value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    // == HMset ==
    /// Writes every attribute of `record` as a field of the bucket under `key`,
    /// all sharing `ttl`.
    ///
    /// The fields are written under a single lock acquisition, so concurrent
    /// readers see either none or all of them.
    ///
    /// # Errors
    /// `InvalidArgument` if the record cannot be decomposed into named fields or
    /// `ttl` is too large to represent. Nothing is written in that case.
    pub fn hmset<R: Record>(&self, key: impl Into<String>, record: R, ttl: Duration) -> Result<()> {
        let key = key.into();
        let fields = record.into_fields().inspect_err(|e| {
            debug!(key = %key, error = %e, "rejected hmset record");
        })?;

        let mut stores = self.shared.stores.write();
        let expires_at = deadline(ttl, Instant::now())?;
        if fields.is_empty() {
            return Ok(());
        }
        let bucket = stores.hashes.entry(key).or_default();
        for (field, value) in fields {
            bucket.insert(field, CacheEntry { value, expires_at });
        }
        Ok(())
    }

    // == HDel ==
    /// Removes one field, expired or not. Returns whether a field was removed.
    pub fn hdel(&self, key: &str, field: &str) -> bool {
        let mut stores = self.shared.stores.write();
        let Some(bucket) = stores.hashes.get_mut(key) else {
            return false;
        };
        let removed = bucket.remove(field).is_some();
        if bucket.is_empty() && self.shared.prune_empty_buckets {
            stores.hashes.remove(key);
        }
        removed
    }

    // == HClear ==
    /// Removes the whole bucket under `key`. Returns whether a bucket was removed.
    pub fn hclear(&self, key: &str) -> bool {
        self.shared.stores.write().hashes.remove(key).is_some()
    }

    /// Looks up a field under the read lock and reclaims it if it turned out expired.
    fn lookup_field<T>(
        &self,
        key: &str,
        field: &str,
        read: impl FnOnce(&CacheEntry) -> T,
    ) -> FieldLookup<T> {
        let lookup = {
            let stores = self.shared.stores.read();
            let now = Instant::now();
            match stores.hashes.get(key).and_then(|bucket| bucket.get(field)) {
                Some(entry) if entry.is_live(now) => FieldLookup::Live(read(entry)),
                Some(_) => FieldLookup::Expired(now),
                None => FieldLookup::Missing,
            }
        };

        self.shared
            .stats
            .record_lookup(matches!(lookup, FieldLookup::Live(_)));
        if let FieldLookup::Expired(now) = lookup {
            self.reclaim_field(key, field, now);
        }
        lookup
    }

    /// Removes `field` if it is still expired as of `now`, pruning an emptied bucket.
    fn reclaim_field(&self, key: &str, field: &str, now: Instant) {
        let mut stores = self.shared.stores.write();
        let Some(bucket) = stores.hashes.get_mut(key) else {
            return;
        };
        if bucket.get(field).is_some_and(|entry| entry.is_expired(now)) {
            bucket.remove(field);
            self.shared.stats.record_expired(1);
            trace!(key = %key, field = %field, "reclaimed expired field on read");
        }
        if bucket.is_empty() && self.shared.prune_empty_buckets {
            stores.hashes.remove(key);
        }
    }
}
