//! Trait definitions for lookup and generation backends.

use async_trait::async_trait;
use marginalia_core::{GenerateRequest, GenerateResponse, LoadProgress, SearchHit, SummaryRecord};
use marginalia_error::MarginaliaResult;
use std::sync::Arc;

/// Normalize a subject name into a lookup key.
///
/// Trims, collapses each internal whitespace run into one underscore, and
/// strips leading and trailing underscores.
///
/// # Examples
///
/// ```
/// use marginalia_interface::normalize_topic;
///
/// assert_eq!(normalize_topic("  hello world  "), "hello_world");
/// assert_eq!(normalize_topic("already_normalized"), "already_normalized");
/// ```
pub fn normalize_topic(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches('_')
        .to_string()
}

/// Source of canonical summaries for named subjects.
///
/// `get_summary`, `get_fact`, `get_fact_with_fallback` and `search` never
/// fail: fetch errors are absorbed into degraded records, placeholder text
/// or empty result lists.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// Fetch the summary for a subject, from cache when fresh.
    async fn get_summary(&self, subject: &str) -> SummaryRecord;

    /// Ranked candidate pages for a free-text query.
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit>;

    /// Drop every cached record.
    async fn clear_cache(&self);

    /// Long-form text for a subject, or a placeholder sentence.
    async fn get_fact(&self, subject: &str) -> String {
        let record = self.get_summary(subject).await;
        if record.is_degraded() {
            format!("No information found for {}.", subject.trim())
        } else {
            record.extract().clone()
        }
    }

    /// Like [`get_fact`](Self::get_fact) but retries against the top search
    /// hit when the subject does not resolve directly.
    async fn get_fact_with_fallback(&self, subject: &str) -> String {
        let record = self.get_summary(subject).await;
        if !record.is_degraded() {
            return record.extract().clone();
        }
        match self.search(subject, 1).await.into_iter().next() {
            Some(hit) => self.get_fact(hit.title()).await,
            None => format!("No information found for {}.", subject.trim()),
        }
    }

    /// Normalized cache key for a subject.
    fn normalize_topic(&self, text: &str) -> String {
        normalize_topic(text)
    }
}

/// Core trait for generative text backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce one completion for the request.
    async fn generate(&self, req: &GenerateRequest) -> MarginaliaResult<GenerateResponse>;

    /// Provider name (e.g., "openai-compatible", "stub").
    fn provider_name(&self) -> &'static str;

    /// Model identifier currently in use.
    fn model_name(&self) -> String;
}

/// Receives model load progress events.
pub type ProgressSink = Arc<dyn Fn(LoadProgress) + Send + Sync>;

/// Builds a ready-to-use generator for a model identifier.
///
/// Loading may be slow (downloads, warm-up); implementations report their
/// progress through the supplied sink.
#[async_trait]
pub trait GeneratorLoader: Send + Sync {
    /// Load `model` and return a generator bound to it.
    async fn load(
        &self,
        model: &str,
        progress: ProgressSink,
    ) -> MarginaliaResult<Arc<dyn TextGenerator>>;
}
