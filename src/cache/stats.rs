//! Cache Statistics Module
//!
//! Tracks cache lookup metrics: hits, misses, and reclaimed expired entries.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of cache metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found a live entry
    pub hits: u64,
    /// Number of lookups that found nothing live (absent or expired)
    pub misses: u64,
    /// Number of expired entries and fields physically removed
    pub expired: u64,
    /// Scalar entries currently held, including expired ones not yet reclaimed
    pub scalar_entries: usize,
    /// Hash buckets currently held
    pub hash_keys: usize,
    /// Fields across all hash buckets, including expired ones not yet reclaimed
    pub hash_fields: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by every handle of one cache.
///
/// Atomics let lookups record hits and misses while holding only the read lock.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

impl StatsRecorder {
    /// Records a lookup outcome.
    pub fn record_lookup(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expired(&self, count: usize) {
        self.expired.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Combines the counters with the entry counts taken under the store lock.
    pub fn snapshot(
        &self,
        scalar_entries: usize,
        hash_keys: usize,
        hash_fields: usize,
    ) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            scalar_entries,
            hash_keys,
            hash_fields,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StatsRecorder::default().snapshot(0, 0, 0);
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = StatsRecorder::default();
        recorder.record_lookup(true);
        recorder.record_lookup(true);
        recorder.record_lookup(true);
        recorder.record_lookup(false);

        let stats = recorder.snapshot(0, 0, 0);
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_expired_and_counts() {
        let recorder = StatsRecorder::default();
        recorder.record_expired(2);
        recorder.record_expired(0);
        recorder.record_expired(3);

        let stats = recorder.snapshot(4, 1, 3);
        assert_eq!(stats.expired, 5);
        assert_eq!(stats.scalar_entries, 4);
        assert_eq!(stats.hash_keys, 1);
        assert_eq!(stats.hash_fields, 3);
    }

    #[test]
    fn test_stats_serialize() {
        let json = serde_json::to_value(CacheStats::default()).unwrap();
        assert_eq!(json["hits"], 0);
        assert_eq!(json["hash_fields"], 0);
    }
}
