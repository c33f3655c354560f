//! Per-principal cache of granted permission lists

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::PermissionCacheConfig;

/// Cached permission list with its creation time
#[derive(Debug, Clone)]
struct CacheEntry {
    permissions: Arc<[String]>,
    created_at: Instant,
}

impl CacheEntry {
    fn new(permissions: Arc<[String]>) -> Self {
        Self {
            permissions,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Statistics about cache performance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of expired entries encountered
    pub expirations: usize,
    /// Total number of entries in cache
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Granted permission lists keyed by principal, valid for one cache window
///
/// A list is read-only once cached; a changed grant becomes visible after
/// the entry expires or is invalidated.
pub struct GrantedPermissionCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    stats: DashMap<&'static str, usize>,
}

impl GrantedPermissionCache {
    /// Create a cache from configuration
    pub fn new(config: &PermissionCacheConfig) -> Self {
        Self::with_ttl(config.ttl, config.capacity)
    }

    /// Create a cache with explicit TTL and capacity
    pub fn with_ttl(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
            stats: DashMap::new(),
        }
    }

    /// Cached permissions for a principal, if present and fresh
    pub fn get(&self, principal: &str) -> Option<Arc<[String]>> {
        if let Some(entry) = self.entries.get(principal) {
            if entry.is_expired(self.ttl) {
                drop(entry);
                self.entries.remove(principal);
                self.increment_stat("expirations");
                self.increment_stat("misses");
                trace!("Permission cache entry expired for {}", principal);
                return None;
            }

            self.increment_stat("hits");
            return Some(Arc::clone(&entry.permissions));
        }

        self.increment_stat("misses");
        None
    }

    /// Store the permissions of a principal
    pub fn insert(&self, principal: &str, permissions: Arc<[String]>) {
        if !self.entries.contains_key(principal) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries
            .insert(principal.to_string(), CacheEntry::new(permissions));
    }

    /// Forget one principal
    pub fn invalidate(&self, principal: &str) -> bool {
        let removed = self.entries.remove(principal).is_some();
        if removed {
            debug!("Invalidated cached permissions for {}", principal);
        }
        removed
    }

    /// Forget every principal
    pub fn clear(&self) {
        self.entries.clear();
        self.stats.clear();
    }

    /// Removes expired entries from the cache
    pub fn cleanup_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
    }

    /// Returns cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.get_stat("hits"),
            misses: self.get_stat("misses"),
            expirations: self.get_stat("expirations"),
            entries: self.entries.len(),
        }
    }

    /// Number of cached principals
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cache TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().created_at)
            .map(|entry| entry.key().clone());

        if let Some(principal) = oldest {
            self.entries.remove(&principal);
            trace!("Evicted cached permissions for {}", principal);
        }
    }

    fn increment_stat(&self, key: &'static str) {
        *self.stats.entry(key).or_insert(0) += 1;
    }

    fn get_stat(&self, key: &'static str) -> usize {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}
