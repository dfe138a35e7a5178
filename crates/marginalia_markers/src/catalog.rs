//! Production marker handlers.

use crate::text::{fill_template, is_template};
use crate::{
    CatalogConfig, MarkerCall, MarkerHandler, MarkerKind, clean_generated, extract_key_info,
    first_sentence, truncate_chars,
};
use async_trait::async_trait;
use marginalia_core::{GenerateRequest, SamplingOptions};
use marginalia_error::{
    GenerationError, GenerationErrorKind, MarginaliaResult, MarkerError, MarkerErrorKind,
};
use marginalia_interface::{ReferenceLookup, TextGenerator, normalize_topic};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Replacement for `ai_answer` when no answer can be produced.
pub const ANSWER_SENTINEL: &str = "I'm unable to answer that question right now.";

const UNKNOWN_DATE: &str = "Unknown";

/// Maps every [`MarkerKind`] to a behavior grounded in a reference lookup.
///
/// With a generator, handlers ask it for prose and fall back to plain
/// lookup-derived text when generation fails. Without one, every handler
/// returns the non-generative text directly.
pub struct HandlerCatalog {
    lookup: Arc<dyn ReferenceLookup>,
    generator: Option<Arc<dyn TextGenerator>>,
    config: CatalogConfig,
}

impl HandlerCatalog {
    /// Create a catalog. Pass `None` for `generator` to run without a
    /// generative backend.
    pub fn new(
        lookup: Arc<dyn ReferenceLookup>,
        generator: Option<Arc<dyn TextGenerator>>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            lookup,
            generator,
            config,
        }
    }

    /// The lookup collaborator.
    pub fn lookup(&self) -> &Arc<dyn ReferenceLookup> {
        &self.lookup
    }

    /// Whether handlers use a generative backend.
    pub fn is_generative(&self) -> bool {
        self.generator.is_some()
    }

    /// Catalog settings.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn sampling(&self, max_new_tokens: u32) -> SamplingOptions {
        SamplingOptions::default()
            .with_max_new_tokens(max_new_tokens)
            .with_temperature(*self.config.temperature())
            .with_deterministic(*self.config.deterministic())
    }

    fn truncated(&self, text: &str) -> String {
        truncate_chars(text, *self.config.fallback_truncate_chars())
    }

    /// Run one completion and clean its output.
    async fn complete_prompt(
        &self,
        generator: &dyn TextGenerator,
        prompt: String,
        max_new_tokens: u32,
    ) -> MarginaliaResult<String> {
        let request = GenerateRequest::builder()
            .prompt(prompt)
            .options(self.sampling(max_new_tokens))
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Api(e.to_string())))?;
        let response = generator.generate(&request).await?;
        clean_generated(response.text())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::EmptyOutput).into())
    }

    /// Generated text, or `fallback` when there is no generator or it fails.
    async fn generate_or(
        &self,
        kind: MarkerKind,
        prompt: String,
        max_new_tokens: u32,
        fallback: String,
    ) -> String {
        let Some(generator) = &self.generator else {
            return fallback;
        };
        match self
            .complete_prompt(generator.as_ref(), prompt, max_new_tokens)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(marker = %kind, error = %e, "Generation failed, using fallback text");
                fallback
            }
        }
    }

    /// Extract for a topic, retrying against the top search hit when the
    /// topic does not resolve directly. `None` when nothing was found.
    async fn grounding(&self, topic: &str) -> Option<String> {
        let record = self.lookup.get_summary(topic).await;
        if !record.is_degraded() {
            return Some(record.extract().clone());
        }
        let hit = self.lookup.search(topic, 1).await.into_iter().next()?;
        let record = self.lookup.get_summary(hit.title()).await;
        (!record.is_degraded()).then(|| record.extract().clone())
    }

    async fn fact(&self, topic: &str) -> String {
        let fact = self.lookup.get_fact_with_fallback(topic).await;
        let prompt = format!(
            "Extract the single most interesting fact about {} from the text below. \
             Reply with one short sentence. A key figure that may help: {}.\n\nText: {}",
            topic,
            extract_key_info(&fact),
            fact
        );
        let fallback = if self.is_generative() {
            self.truncated(&fact)
        } else {
            fact
        };
        self.generate_or(MarkerKind::Fact, prompt, 60, fallback).await
    }

    async fn describe(&self, topic: &str) -> String {
        let record = self.lookup.get_summary(topic).await;
        let prompt = format!(
            "Describe {} in one sentence based on this text: {}",
            record.title(),
            record.extract()
        );
        let fallback = first_sentence(record.extract()).to_string();
        self.generate_or(MarkerKind::Describe, prompt, 60, fallback)
            .await
    }

    async fn rewrite(&self, topic: &str, text: &str) -> String {
        let fact = self.lookup.get_fact_with_fallback(topic).await;

        if is_template(text) {
            let filled = fill_template(text, &extract_key_info(&fact));
            let prompt = format!(
                "Rewrite this sentence so it reads naturally. Keep every number and name \
                 unchanged: {}",
                filled
            );
            return self
                .generate_or(MarkerKind::Rewrite, prompt, 80, filled)
                .await;
        }

        let Some(generator) = &self.generator else {
            return first_sentence(&fact).to_string();
        };
        let prompt = format!(
            "Using this fact: {}\n\nRewrite the following sentence so it is accurate. \
             Reply with the rewritten sentence only: {}",
            fact, text
        );
        match self.complete_prompt(generator.as_ref(), prompt, 80).await {
            Ok(rewritten) => rewritten,
            Err(e) => {
                warn!(marker = %MarkerKind::Rewrite, error = %e, "Generation failed, keeping sentence");
                text.to_string()
            }
        }
    }

    async fn paragraph(&self, topic: &str) -> String {
        let record = self.lookup.get_summary(topic).await;
        let prompt = format!(
            "Write a paragraph of two or three sentences about {} based on this text: {}",
            record.title(),
            record.extract()
        );
        let fallback = self.truncated(record.extract());
        self.generate_or(MarkerKind::Paragraph, prompt, 150, fallback)
            .await
    }

    async fn summary(&self, topic: &str) -> String {
        let record = self.lookup.get_summary(topic).await;
        let prompt = format!(
            "Summarize the following text in one sentence: {}",
            record.extract()
        );
        let fallback = self.truncated(record.extract());
        self.generate_or(MarkerKind::Summary, prompt, 60, fallback)
            .await
    }

    async fn answer(&self, topic: Option<&str>, question: &str) -> String {
        let context = match topic {
            Some(topic) => self.grounding(topic).await,
            None => None,
        };

        let Some(generator) = &self.generator else {
            return context
                .map(|c| first_sentence(&c).to_string())
                .unwrap_or_else(|| ANSWER_SENTINEL.to_string());
        };

        let prompt = match &context {
            Some(context) => format!(
                "Answer the question using only the context. Reply in one or two sentences.\n\n\
                 Context: {}\n\nQuestion: {}",
                context, question
            ),
            None => format!("Answer briefly in one or two sentences: {}", question),
        };
        match self.complete_prompt(generator.as_ref(), prompt, 100).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(marker = %MarkerKind::Answer, error = %e, "Generation failed, using sentinel");
                ANSWER_SENTINEL.to_string()
            }
        }
    }

    async fn link(&self, topic: &str) -> String {
        let record = self.lookup.get_summary(topic).await;
        match record.canonical_url() {
            Some(url) if !record.is_degraded() => url.clone(),
            _ => format!("{}{}", self.config.page_url(), normalize_topic(topic)),
        }
    }

    async fn updated(&self, topic: &str) -> String {
        let record = self.lookup.get_summary(topic).await;
        if record.is_degraded() {
            return UNKNOWN_DATE.to_string();
        }
        format_timestamp(record.timestamp()).unwrap_or_else(|| UNKNOWN_DATE.to_string())
    }
}

impl std::fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerCatalog")
            .field("generative", &self.is_generative())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Render an RFC 3339 timestamp as e.g. `March 5, 2024`.
fn format_timestamp(timestamp: &str) -> Option<String> {
    chrono::DateTime::parse_from_rfc3339(timestamp.trim())
        .ok()
        .map(|t| t.format("%B %-d, %Y").to_string())
}

/// Required, non-blank parameter `index`.
fn required<'a>(call: &'a MarkerCall, index: usize, expected: usize) -> MarginaliaResult<&'a str> {
    match call.param(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(MarkerError::new(MarkerErrorKind::MissingParameter {
            marker: call.kind().to_string(),
            expected,
            got: call.params().iter().filter(|p| !p.is_empty()).count(),
        })
        .into()),
    }
}

#[async_trait]
impl MarkerHandler for HandlerCatalog {
    #[instrument(skip(self, call), fields(marker = %call.kind(), params = call.params().len()))]
    async fn handle(&self, call: &MarkerCall) -> MarginaliaResult<String> {
        debug!("Dispatching marker");
        let text = match call.kind() {
            MarkerKind::Fact => self.fact(required(call, 0, 1)?).await,
            MarkerKind::Describe => self.describe(required(call, 0, 1)?).await,
            MarkerKind::Rewrite => {
                self.rewrite(required(call, 0, 2)?, required(call, 1, 2)?)
                    .await
            }
            MarkerKind::Complete => call.raw_params().clone(),
            MarkerKind::Paragraph => self.paragraph(required(call, 0, 1)?).await,
            MarkerKind::Summary => self.summary(required(call, 0, 1)?).await,
            MarkerKind::Answer => match call.params().len() {
                0 | 1 => self.answer(None, required(call, 0, 1)?).await,
                _ => {
                    self.answer(Some(required(call, 0, 2)?), required(call, 1, 2)?)
                        .await
                }
            },
            MarkerKind::Link => self.link(required(call, 0, 1)?).await,
            MarkerKind::Updated => self.updated(required(call, 0, 1)?).await,
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2024-03-05T10:00:00Z").as_deref(),
            Some("March 5, 2024")
        );
        assert_eq!(
            format_timestamp("2023-11-21T23:59:59+02:00").as_deref(),
            Some("November 21, 2023")
        );
        assert_eq!(format_timestamp("yesterday"), None);
        assert_eq!(format_timestamp(""), None);
    }

    #[test]
    fn test_required_rejects_blank() {
        let call = MarkerCall::new(MarkerKind::Fact, " ", vec![String::new()]);
        assert!(required(&call, 0, 1).is_err());

        let call = MarkerCall::new(MarkerKind::Fact, "Rust", vec!["Rust".to_string()]);
        assert_eq!(required(&call, 0, 1).unwrap(), "Rust");
    }
}
