//! Wikipedia REST client with caching and degraded fallbacks.

use crate::LookupConfig;
use crate::dto::{PageSummary, SearchResponse};
use async_trait::async_trait;
use marginalia_cache::TtlCache;
use marginalia_core::{SearchHit, SummaryRecord};
use marginalia_error::{HttpError, LookupError, LookupErrorKind, MarginaliaResult};
use marginalia_interface::{ReferenceLookup, normalize_topic};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// Reference lookup backed by the Wikipedia REST API.
///
/// Successful summaries are cached by normalized subject for
/// `cache_ttl_secs`. Failed fetches are never cached, so a later call
/// retries the network.
#[derive(Debug)]
pub struct WikipediaClient {
    config: LookupConfig,
    http: reqwest::Client,
    cache: Mutex<TtlCache<SummaryRecord>>,
}

impl WikipediaClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[instrument(skip(config), fields(summary_url = %config.summary_url()))]
    pub fn new(config: LookupConfig) -> MarginaliaResult<Self> {
        debug!("Creating Wikipedia client");
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent().as_str())
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        let cache = Mutex::new(TtlCache::new(config.cache_config()));
        Ok(Self {
            config,
            http,
            cache,
        })
    }

    /// Client configuration.
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Number of summaries currently cached.
    pub async fn cache_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Fetch a summary from the network, bypassing the cache and retrying
    /// transient failures.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or immediately for
    /// permanent failures such as a missing page.
    #[instrument(skip(self))]
    pub async fn fetch_summary(&self, topic: &str) -> Result<SummaryRecord, LookupError> {
        let key = normalize_topic(topic);
        if key.is_empty() {
            return Err(LookupError::new(LookupErrorKind::EmptyTopic));
        }

        let strategy = ExponentialBackoff::from_millis(*self.config.retry_backoff_ms())
            .factor(2)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(*self.config.max_retries());

        let key = key.as_str();
        Retry::spawn(strategy, move || async move {
            match self.fetch_summary_once(key).await {
                Ok(record) => Ok(record),
                Err(e) if e.kind.is_transient() => {
                    warn!(error = %e, "Summary fetch failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await
    }

    async fn fetch_summary_once(&self, key: &str) -> Result<SummaryRecord, LookupError> {
        let mut url = reqwest::Url::parse(self.config.summary_url())
            .map_err(|e| LookupError::new(LookupErrorKind::Http(format!("Bad summary URL: {}", e))))?;
        url.path_segments_mut()
            .map_err(|_| {
                LookupError::new(LookupErrorKind::Http(
                    "Summary URL cannot be a base".to_string(),
                ))
            })?
            .pop_if_empty()
            .push(key);

        debug!(url = %url, "Fetching page summary");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::new(LookupErrorKind::Http(e.to_string())))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::new(LookupErrorKind::NotFound(key.to_string())));
        }
        if !status.is_success() {
            return Err(LookupError::new(LookupErrorKind::Status(status.as_u16())));
        }

        let page: PageSummary = response
            .json()
            .await
            .map_err(|e| LookupError::new(LookupErrorKind::Decode(e.to_string())))?;

        Ok(self.to_record(page, key))
    }

    fn to_record(&self, page: PageSummary, key: &str) -> SummaryRecord {
        let short_extract = page
            .extract
            .split('\n')
            .find(|p| !p.trim().is_empty())
            .unwrap_or_default()
            .trim()
            .to_string();
        let canonical_url = page
            .content_urls
            .and_then(|urls| urls.desktop)
            .map(|desktop| desktop.page)
            .or_else(|| Some(self.config.page_link(key)));

        SummaryRecord::builder()
            .title(page.title)
            .description(page.description.unwrap_or_default())
            .extract(page.extract)
            .short_extract(short_extract)
            .thumbnail_url(page.thumbnail.map(|t| t.source))
            .canonical_url(canonical_url)
            .timestamp(page.timestamp.unwrap_or_default())
            .build()
            .unwrap_or_else(|_| SummaryRecord::degraded(key))
    }

    async fn search_once(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, LookupError> {
        let response = self
            .http
            .get(self.config.search_url())
            .query(&[("q", query.to_string()), ("limit", limit.to_string())])
            .send()
            .await
            .map_err(|e| LookupError::new(LookupErrorKind::Http(e.to_string())))?;

        if !response.status().is_success() {
            return Err(LookupError::new(LookupErrorKind::Status(
                response.status().as_u16(),
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| LookupError::new(LookupErrorKind::Decode(e.to_string())))?;

        Ok(body
            .pages
            .into_iter()
            .take(limit)
            .map(|page| {
                let url = self.config.page_link(&page.key);
                SearchHit::new(page.title, page.description.unwrap_or_default(), url)
            })
            .collect())
    }
}

#[async_trait]
impl ReferenceLookup for WikipediaClient {
    #[instrument(skip(self))]
    async fn get_summary(&self, subject: &str) -> SummaryRecord {
        let key = normalize_topic(subject);
        if key.is_empty() {
            warn!("Empty subject, returning degraded record");
            return SummaryRecord::degraded(subject.trim());
        }

        if let Some(entry) = self.cache.lock().await.get(&key) {
            debug!(cache_hit = true, "Serving summary from cache");
            return entry.value().clone();
        }

        match self.fetch_summary(&key).await {
            Ok(record) => {
                self.cache.lock().await.insert(&key, record.clone(), None);
                record
            }
            Err(e) => {
                warn!(error = %e, "Summary fetch failed, returning degraded record");
                SummaryRecord::degraded(subject.trim())
            }
        }
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        if query.trim().is_empty() || limit == 0 {
            return Vec::new();
        }
        match self.search_once(query.trim(), limit).await {
            Ok(hits) => {
                debug!(hits = hits.len(), "Search completed");
                hits
            }
            Err(e) => {
                warn!(error = %e, "Search failed, returning no results");
                Vec::new()
            }
        }
    }

    async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }
}
