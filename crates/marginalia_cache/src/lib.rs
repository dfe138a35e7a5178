//! Keyed cache with TTL expiry and LRU eviction.
//!
//! Used by the reference lookup collaborator to avoid refetching summaries
//! for subjects it has seen recently.

#![warn(missing_docs)]

mod cache;

pub use cache::{CacheConfig, CacheConfigBuilder, CacheEntry, TtlCache};
