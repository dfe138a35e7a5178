//! Configuration for the Wikipedia lookup client.

use derive_getters::Getters;
use marginalia_cache::{CacheConfig, CacheConfigBuilder};
use serde::{Deserialize, Serialize};

/// Endpoints, timeouts and cache policy for [`WikipediaClient`](crate::WikipediaClient).
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
#[setters(prefix = "with_", into)]
#[builder(setter(into))]
pub struct LookupConfig {
    /// Page summary endpoint; the title is appended as a path segment
    #[serde(default = "default_summary_url")]
    #[builder(default = "default_summary_url()")]
    summary_url: String,
    /// Full-text page search endpoint
    #[serde(default = "default_search_url")]
    #[builder(default = "default_search_url()")]
    search_url: String,
    /// Base for constructed page links
    #[serde(default = "default_page_url")]
    #[builder(default = "default_page_url()")]
    page_url: String,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    #[builder(default = "default_user_agent()")]
    user_agent: String,
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    #[builder(default = "default_timeout_secs()")]
    timeout_secs: u64,
    /// Retries for transient failures (429, 5xx, network)
    #[serde(default = "default_max_retries")]
    #[builder(default = "default_max_retries()")]
    max_retries: usize,
    /// Initial retry backoff (milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    #[builder(default = "default_retry_backoff_ms()")]
    retry_backoff_ms: u64,
    /// Lifetime of cached summaries (seconds)
    #[serde(default = "default_cache_ttl_secs")]
    #[builder(default = "default_cache_ttl_secs()")]
    cache_ttl_secs: u64,
    /// Maximum number of cached summaries
    #[serde(default = "default_cache_max_entries")]
    #[builder(default = "default_cache_max_entries()")]
    cache_max_entries: usize,
}

fn default_summary_url() -> String {
    "https://en.wikipedia.org/api/rest_v1/page/summary/".to_string()
}

fn default_search_url() -> String {
    "https://en.wikipedia.org/w/rest.php/v1/search/page".to_string()
}

fn default_page_url() -> String {
    "https://en.wikipedia.org/wiki/".to_string()
}

fn default_user_agent() -> String {
    format!(
        "marginalia/{} (https://github.com/marginalia-rs/marginalia)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> usize {
    2
}

fn default_retry_backoff_ms() -> u64 {
    200
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_cache_max_entries() -> usize {
    500
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            summary_url: default_summary_url(),
            search_url: default_search_url(),
            page_url: default_page_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
        }
    }
}

impl LookupConfig {
    /// Cache policy derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfigBuilder::default()
            .default_ttl(self.cache_ttl_secs)
            .max_size(self.cache_max_entries)
            .enabled(self.cache_max_entries > 0)
            .build()
            .unwrap_or_default()
    }

    /// Page link for a normalized topic.
    pub fn page_link(&self, normalized_topic: &str) -> String {
        format!("{}{}", self.page_url, normalized_topic)
    }
}
