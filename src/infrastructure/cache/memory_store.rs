//! In-memory LRU byte store.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::domain::ports::{ByteStorePort, CachedResource};

/// Default maximum number of payloads kept in memory.
pub const DEFAULT_MEMORY_ENTRIES: usize = 256;

/// Bounded in-memory store. Least recently used entries are dropped first.
pub struct MemoryByteStore {
    cache: Mutex<LruCache<Url, CachedResource>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryByteStore {
    /// Creates a new store with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns store statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Returns an entry without promoting it.
    #[must_use]
    pub fn peek(&self, url: &Url) -> Option<CachedResource> {
        self.cache.lock().peek(url).cloned()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.cache.lock().clear();
        debug!("Cleared memory byte store");
    }
}

impl Default for MemoryByteStore {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_ENTRIES)
    }
}

/// Statistics about store performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of lookups that found an entry.
    pub hits: u64,
    /// Number of lookups that found nothing.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of entries.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} entries, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

impl ByteStorePort for MemoryByteStore {
    fn lookup(&self, url: &Url) -> Option<CachedResource> {
        let found = self.cache.lock().get(url).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(url = %url, "Memory store hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(url = %url, "Memory store miss");
        }
        found
    }

    fn store(&self, url: &Url, bytes: Bytes, is_image: bool) {
        trace!(url = %url, len = bytes.len(), is_image, "Storing in memory");
        self.cache
            .lock()
            .put(url.clone(), CachedResource::new(bytes, is_image));
    }

    fn contains(&self, url: &Url) -> bool {
        self.cache.lock().contains(url)
    }
}
