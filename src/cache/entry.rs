//! Cache Entry Module
//!
//! Defines the structure of a single cached file version.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// One cached file version.
///
/// Content is immutable after creation; a changed file always produces a
/// replacement entry. Only the access bookkeeping mutates on a hit.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached file content, shared with callers without copying
    pub content: Arc<str>,
    /// Byte length of `content`, drives memory accounting
    pub size: usize,
    /// On-disk path the content was read from
    pub source_path: PathBuf,
    /// Filesystem modification time captured when the entry was cached
    pub source_modified_at: DateTime<Utc>,
    /// SHA-256 of `content` at cache time; None when integrity checks are off
    pub fingerprint: Option<String>,
    /// Timestamp of the most recent access
    pub last_accessed_at: DateTime<Utc>,
    /// Number of cache hits served from this entry
    pub access_count: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry for freshly read content.
    pub fn new(
        content: Arc<str>,
        source_path: PathBuf,
        source_modified_at: DateTime<Utc>,
        fingerprint: Option<String>,
    ) -> Self {
        let size = content.len();
        Self {
            content,
            size,
            source_path,
            source_modified_at,
            fingerprint,
            last_accessed_at: Utc::now(),
            access_count: 0,
        }
    }

    // == Touch ==
    /// Records a hit: refreshes the access timestamp and bumps the counter.
    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
        self.access_count += 1;
    }

    // == Idle Time ==
    /// Time elapsed since the last access, as seen from `now`.
    ///
    /// Clamped to zero if the clock reads earlier than the last access.
    pub fn idle_time(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.last_accessed_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}
