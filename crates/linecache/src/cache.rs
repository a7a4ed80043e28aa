//! CachedLineLookup: LRU cache in front of a line locator

use parking_lot::Mutex;
use tracing::{debug, trace};

use linestore::{LineLocator, Result};

use crate::key::CacheKey;
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Line lookups served from a bounded LRU cache, falling back to a scan
///
/// Only successful scans are cached. The store sits behind a single mutex
/// that is held for the synchronous `get`/`put` only, never across a scan,
/// so recency updates and evictions are indivisible on a multi-threaded
/// runtime.
///
/// Concurrent misses on the same key are not coalesced: each one scans the
/// dataset and stores the same text.
pub struct CachedLineLookup<L> {
    /// Fallback for cache misses
    locator: L,

    /// Hot lines
    cache: Mutex<LruCache<CacheKey, String>>,

    /// Lookup statistics
    stats: CacheStats,
}

impl<L: LineLocator> CachedLineLookup<L> {
    /// Wrap `locator` with a cache of at most `capacity` lines
    ///
    /// # Arguments
    /// * `locator` - Source of truth for lines not in the cache
    /// * `capacity` - Maximum number of cached lines; 0 disables caching
    pub fn new(locator: L, capacity: usize) -> Self {
        Self {
            locator,
            cache: Mutex::new(LruCache::new(capacity)),
            stats: CacheStats::new(),
        }
    }

    /// Line `line_number` (1-indexed) of dataset `file_id`
    ///
    /// # Returns
    /// * `Ok(text)` - Line text without its terminator
    /// * `Err(Error::NotFound)` - Line is out of range; nothing is cached
    /// * `Err(Error::SourceUnavailable)` - Dataset could not be read
    pub async fn lookup(&self, file_id: &str, line_number: u64) -> Result<String> {
        let key = CacheKey::new(file_id, line_number);

        let cached = self.cache.lock().get(&key).cloned();
        if let Some(text) = cached {
            self.stats.record_hit();
            return Ok(text);
        }

        self.stats.record_miss();
        debug!(%key, "cache miss");
        let text = self.locator.locate(file_id, line_number).await?;

        let evicted = self.cache.lock().put(key, text.clone());
        self.stats.record_insert();
        if let Some((old, _)) = evicted {
            self.stats.record_eviction();
            trace!(key = %old, "evicted");
        }

        Ok(text)
    }

    /// Underlying locator
    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Lookup statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached lines
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Maximum number of cached lines
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }

    /// Drop all cached lines and reset statistics
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
        self.stats.reset();
    }
}
