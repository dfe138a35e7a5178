//! Tests for TTL cache behavior.

use marginalia_cache::{CacheConfig, CacheConfigBuilder, TtlCache};
use std::thread::sleep;
use std::time::Duration;

#[test]
fn test_cache_insert_and_get() {
    let mut cache = TtlCache::new(CacheConfig::default());

    cache.insert("JavaScript", "a language".to_string(), Some(60));

    let entry = cache.get("JavaScript").unwrap();
    assert_eq!(entry.value(), "a language");
}

#[test]
fn test_cache_miss() {
    let mut cache: TtlCache<String> = TtlCache::new(CacheConfig::default());
    assert!(cache.get("Nothing_here").is_none());
}

#[test]
fn test_cache_expiration() {
    let mut cache = TtlCache::new(CacheConfig::default());

    cache.insert("Rust", 1_u32, Some(1));
    assert!(cache.get("Rust").is_some());

    sleep(Duration::from_millis(1100));

    assert!(cache.get("Rust").is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_cache_replaces_existing_key() {
    let mut cache = TtlCache::new(CacheConfig::default());

    cache.insert("Rust", 1_u32, None);
    cache.insert("Rust", 2_u32, None);

    assert_eq!(cache.len(), 1);
    assert_eq!(*cache.get("Rust").unwrap().value(), 2);
}

#[test]
fn test_cache_lru_eviction() {
    let config = CacheConfigBuilder::default().max_size(2).build().unwrap();
    let mut cache = TtlCache::new(config);

    cache.insert("a", 1_u32, None);
    cache.insert("b", 2_u32, None);

    // Touch "a" so "b" becomes least recently used
    assert!(cache.get("a").is_some());

    cache.insert("c", 3_u32, None);

    assert_eq!(cache.len(), 2);
    assert!(cache.get("a").is_some());
    assert!(cache.get("b").is_none());
    assert!(cache.get("c").is_some());
}

#[test]
fn test_cache_disabled() {
    let config = CacheConfig::default().with_enabled(false);
    let mut cache = TtlCache::new(config);

    cache.insert("Rust", 1_u32, None);

    assert!(cache.get("Rust").is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_cache_clear() {
    let mut cache = TtlCache::new(CacheConfig::default());

    cache.insert("a", 1_u32, None);
    cache.insert("b", 2_u32, None);
    assert_eq!(cache.len(), 2);

    cache.clear();

    assert!(cache.is_empty());
    assert!(cache.get("a").is_none());
}

#[test]
fn test_cleanup_expired() {
    let mut cache = TtlCache::new(CacheConfig::default());

    cache.insert("short", 1_u32, Some(0));
    cache.insert("long", 2_u32, Some(600));

    sleep(Duration::from_millis(20));

    assert_eq!(cache.cleanup_expired(), 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.get("long").is_some());
}

#[test]
fn test_remove_returns_value() {
    let mut cache = TtlCache::new(CacheConfig::default());
    cache.insert("a", "x".to_string(), None);

    assert_eq!(cache.remove("a").as_deref(), Some("x"));
    assert!(cache.remove("a").is_none());
}
