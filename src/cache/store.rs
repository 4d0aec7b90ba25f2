//! Cache Store Module
//!
//! Single-threaded cache engine: HashMap storage kept in lockstep with an LRU
//! tracker, a fixed capacity and a fixed TTL applied to every write.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Bounded LRU cache with lazy TTL expiry.
///
/// Callers get clones of stored values, never references into storage.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
    counters: Counters,
    capacity: usize,
    ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a store holding at most `capacity` entries, each living `ttl`.
    ///
    /// A capacity of zero is raised to one so that `set` always stores.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: Counters::default(),
            capacity: capacity.max(1),
            ttl,
        }
    }

    // == Get ==
    /// Returns a clone of the value for `key` if a non-expired entry exists.
    ///
    /// A hit bumps the key to most recently used. An expired entry is removed
    /// on the spot and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            None => {
                self.counters.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.counters.record_miss();
            debug!(key, "cache entry expired");
            return None;
        }

        self.lru.touch(key);
        self.counters.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Inserts or overwrites `key` with a fresh expiry of now + ttl.
    ///
    /// Inserting a new key into a full store first evicts the least recently
    /// used key. Overwrites never evict. The key ends up most recently used.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(evicted) = self.lru.pop_least_recent() {
                self.entries.remove(&evicted);
                self.counters.record_eviction();
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, self.ttl));
        self.lru.touch(&key);
    }

    // == Clear ==
    /// Empties storage and recency order and resets every counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.counters.reset();
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.entries.len())
    }

    // == Cleanup Expired ==
    /// Removes every expired entry and returns how many were dropped.
    ///
    /// Hit/miss counters are left untouched; this is housekeeping, not a lookup.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        expired.len()
    }

    /// Entry count, not filtered for expiry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the map and the recency order hold exactly the same keys.
    #[cfg(test)]
    pub fn is_consistent(&self) -> bool {
        self.lru.len() == self.entries.len()
            && self.lru.iter().all(|key| self.entries.contains_key(key))
    }
}
