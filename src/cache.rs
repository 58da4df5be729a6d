/*!
 * Expiring cache for memoized lookups.
 *
 * Entries carry their own expiration instant. An expired entry is treated as
 * a miss and recomputed; it is never refreshed in place.
 */

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use parking_lot::RwLock;
use log::debug;

/// A cached value and the instant it stops being valid
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Shared cache whose entries expire after a per-entry time to live
///
/// Clones share the same storage, so one cache can be handed to several
/// providers.
pub struct ExpiringCache<K, V> {
    /// Internal cache storage
    entries: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
        }
    }

    /// Get a live value from the cache
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let found = self
            .entries
            .read()
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone());

        if found.is_some() {
            *self.hits.write() += 1;
            debug!("Cache hit for {:?}", key);
        } else {
            *self.misses.write() += 1;
            debug!("Cache miss for {:?}", key);
        }

        found
    }

    /// Store a value that stays valid for `ttl`
    pub fn insert(&self, key: K, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries.write().insert(key, CacheEntry { value, expires_at });
    }

    /// Return the cached value for `key`, or compute, store and return it
    ///
    /// Errors from `compute` are returned as is and nothing is stored. Two
    /// concurrent misses on the same key may both compute; the last write wins.
    /// Expired entries are purged on every miss.
    pub async fn get_or_compute<F, Fut, E>(&self, key: K, ttl: Duration, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        self.purge_expired();
        let value = compute().await?;
        self.insert(key, value.clone(), ttl);
        Ok(value)
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.write().retain(|_, entry| entry.expires_at > now);
    }

    /// Get cache statistics
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.entries.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;

        debug!("Cache cleared");
    }

    /// Get the number of entries in the cache, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K, V> Default for ExpiringCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for ExpiringCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
        }
    }
}

impl<K, V> fmt::Debug for ExpiringCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("entries", &self.entries.read().len())
            .field("hits", &*self.hits.read())
            .field("misses", &*self.misses.read())
            .finish()
    }
}
