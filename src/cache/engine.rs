//! Cache Engine Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, dual
//! byte/entry budgets, idle-time expiry, and integrity re-verification.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, IntegrityStore, LruTracker};
use crate::config::CacheConfig;

/// Evicting at least this many entries for a single insert is logged loudly.
const EVICTION_BURST_WARN: usize = 16;

// == Cache Engine ==
/// In-memory file content cache with LRU eviction under a dual constraint:
/// entry count and total bytes must both stay within budget.
///
/// The engine itself performs no I/O; the gateway stats files and passes the
/// live modification time into `get`, which lets every hit be re-validated
/// against the filesystem without the engine owning a filesystem handle.
#[derive(Debug)]
pub struct CacheEngine {
    /// Normalized path key -> cached entry
    entries: HashMap<String, CacheEntry>,
    /// Access order; least recently used key is the eviction victim
    lru: LruTracker,
    /// Cumulative performance counters
    stats: CacheStats,
    /// Running total of cached content bytes; always equals the sum of
    /// entry sizes because every insert/remove adjusts it in the same step
    total_bytes: usize,
    max_memory_usage: usize,
    max_entries: usize,
    max_file_size: usize,
    ttl: Duration,
    integrity_check_enabled: bool,
}

impl CacheEngine {
    // == Constructor ==
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            total_bytes: 0,
            max_memory_usage: config.max_memory_usage,
            max_entries: config.max_entries,
            max_file_size: config.max_file_size,
            ttl: config.ttl,
            integrity_check_enabled: config.integrity_check_enabled,
        }
    }

    // == Get ==
    /// Looks up `key`, re-validating the entry before serving it.
    ///
    /// A hit is only a hit if the stored modification time still matches the
    /// live one and (when enabled) the stored content still matches its
    /// fingerprint. A stale or corrupted entry is evicted and reported as a
    /// miss so the caller falls through to a fresh disk read.
    pub fn get(&mut self, key: &str, live_modified_at: DateTime<Utc>) -> Option<Arc<str>> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.source_modified_at != live_modified_at {
            debug!(key, "source file changed since caching, evicting entry");
            self.remove_entry(key);
            self.stats.record_eviction();
            self.stats.record_miss();
            return None;
        }

        if self.integrity_check_enabled {
            if let Some(stored) = entry.fingerprint.as_deref() {
                if IntegrityStore::fingerprint(&entry.content) != stored {
                    warn!(
                        key,
                        path = %entry.source_path.display(),
                        "cached content failed integrity verification, evicting entry"
                    );
                    self.remove_entry(key);
                    self.stats.record_eviction();
                    self.stats.record_miss();
                    return None;
                }
            }
        }

        self.lru.record_access(key);
        self.stats.record_hit();
        let entry = self.entries.get_mut(key)?;
        entry.touch();
        Some(Arc::clone(&entry.content))
    }

    // == Put ==
    /// Inserts or replaces the entry for `key`.
    ///
    /// Content above the per-file ceiling is rejected softly: the caller
    /// keeps its content, the cache just declines to hold it. Otherwise an
    /// eviction pre-pass removes LRU victims until both the byte and entry
    /// budgets can accommodate the insert. Returns whether the entry was
    /// stored.
    pub fn put(
        &mut self,
        key: String,
        source_path: PathBuf,
        content: Arc<str>,
        source_modified_at: DateTime<Utc>,
    ) -> bool {
        let size = content.len();
        if size > self.max_file_size {
            debug!(
                key = %key,
                size,
                max = self.max_file_size,
                "content exceeds per-file ceiling, not caching"
            );
            return false;
        }

        // An entry being replaced must release its budget share before the
        // pre-pass, or the old version could evict unrelated entries.
        self.remove_entry(&key);

        let mut evicted = 0usize;
        while self.total_bytes + size > self.max_memory_usage
            || self.entries.len() + 1 > self.max_entries
        {
            let Some(victim) = self.lru.evict_lru() else {
                break;
            };
            if let Some(old) = self.entries.remove(&victim) {
                self.total_bytes -= old.size;
            }
            self.stats.record_eviction();
            evicted += 1;
        }
        if evicted >= EVICTION_BURST_WARN {
            warn!(evicted, key = %key, "eviction burst while making room for entry");
        } else if evicted > 0 {
            debug!(evicted, key = %key, "evicted entries to make room");
        }

        let fingerprint = self
            .integrity_check_enabled
            .then(|| IntegrityStore::fingerprint(&content));
        let entry = CacheEntry::new(content, source_path, source_modified_at, fingerprint);
        self.total_bytes += entry.size;
        self.entries.insert(key.clone(), entry);
        self.lru.record_access(&key);
        true
    }

    // == Invalidate ==
    /// Removes the entry if present; returns whether anything was removed.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    /// Empties the cache. Cumulative hit/miss/eviction counters are kept;
    /// use `reset_stats` to zero them explicitly.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.total_bytes = 0;
    }

    // == Expire Idle Entries ==
    /// Evicts every entry idle longer than the configured TTL, as seen from
    /// `now`. Returns the number of entries removed.
    pub fn expire_older_than(&mut self, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.idle_time(now) > self.ttl)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
            self.stats.record_eviction();
        }

        expired.len()
    }

    // == Stats ==
    /// Returns a snapshot of the counters plus current entry/byte totals.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.total_bytes = self.total_bytes;
        stats.hit_rate = stats.hit_rate();
        stats
    }

    // == Reset Stats ==
    /// Zeroes the cumulative counters without touching cached entries.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::new();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current bytes of cached content.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Removes an entry, keeping aggregates and LRU order in sync.
    fn remove_entry(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.total_bytes -= entry.size;
                self.lru.remove(key);
                true
            }
            None => false,
        }
    }
}
