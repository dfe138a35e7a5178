//! TTL cache implementation.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Cache entry with value and expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.created_at.elapsed())
    }
}

/// Configuration for [`TtlCache`].
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct CacheConfig {
    /// Default TTL for cached entries (seconds)
    #[serde(default = "default_ttl")]
    #[builder(default = "default_ttl()")]
    default_ttl: u64,

    /// Maximum cache size (number of entries)
    #[serde(default = "default_max_size")]
    #[builder(default = "default_max_size()")]
    max_size: usize,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    #[builder(default = "default_enabled()")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    3600
}

fn default_max_size() -> usize {
    500
}

fn default_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            max_size: default_max_size(),
            enabled: default_enabled(),
        }
    }
}

/// String-keyed cache with TTL expiration and LRU eviction.
///
/// # Example
///
/// ```
/// use marginalia_cache::{CacheConfig, TtlCache};
///
/// let mut cache = TtlCache::new(CacheConfig::default());
/// cache.insert("Rust", "A programming language".to_string(), None);
///
/// assert_eq!(cache.get("Rust").map(|e| e.value().as_str()), Some("A programming language"));
/// assert!(cache.get("Go").is_none());
/// ```
#[derive(Debug)]
pub struct TtlCache<V> {
    config: CacheConfig,
    entries: HashMap<String, CacheEntry<V>>,
    access_order: VecDeque<String>,
}

impl<V> TtlCache<V> {
    /// Create a new cache with configuration.
    pub fn new(config: CacheConfig) -> Self {
        tracing::debug!(
            default_ttl = config.default_ttl,
            max_size = config.max_size,
            enabled = config.enabled,
            "Creating new TtlCache"
        );
        Self {
            config,
            entries: HashMap::new(),
            access_order: VecDeque::new(),
        }
    }

    /// Cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Insert a value, replacing any previous entry under the same key.
    ///
    /// `ttl_seconds` overrides the configured default when given.
    #[tracing::instrument(skip(self, value), fields(cache_size = self.entries.len()))]
    pub fn insert(&mut self, key: &str, value: V, ttl_seconds: Option<u64>) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }

        let ttl = Duration::from_secs(ttl_seconds.unwrap_or(self.config.default_ttl));

        if self.entries.len() >= self.config.max_size && !self.entries.contains_key(key) {
            self.evict_lru();
        }

        self.touch(key);

        tracing::debug!(ttl = ?ttl, "Inserted entry into cache");

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                created_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Get a fresh entry.
    ///
    /// Returns None if the entry doesn't exist, is expired, or the cache is
    /// disabled. Expired entries are removed on access.
    #[tracing::instrument(skip(self), fields(cache_size = self.entries.len()))]
    pub fn get(&mut self, key: &str) -> Option<&CacheEntry<V>> {
        if !self.config.enabled {
            return None;
        }

        if self.entries.get(key)?.is_expired() {
            tracing::debug!("Cache entry expired, removing");
            self.remove(key);
            return None;
        }

        self.touch(key);

        let entry = self.entries.get(key)?;
        tracing::debug!(time_remaining = ?entry.time_remaining(), "Cache hit");
        Some(entry)
    }

    /// Remove one entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            self.access_order.remove(pos);
        }
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Remove expired entries from cache.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_expired());
        let entries = &self.entries;
        self.access_order.retain(|k| entries.contains_key(k));

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(
                removed,
                remaining = self.entries.len(),
                "Cleaned up expired cache entries"
            );
        }
        removed
    }

    /// Clear all cache entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.access_order.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Get number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            self.access_order.remove(pos);
        }
        self.access_order.push_back(key.to_string());
    }

    fn evict_lru(&mut self) {
        if let Some(key) = self.access_order.pop_front() {
            tracing::debug!(key = %key, "Evicting LRU entry");
            self.entries.remove(&key);
        }
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
