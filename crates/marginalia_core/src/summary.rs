//! Summary records produced by the reference lookup service.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Canonical summary of a named subject.
///
/// A record with `is_degraded == true` is a placeholder synthesized when the
/// underlying fetch failed; its text fields are generic and its URLs are empty.
///
/// # Examples
///
/// ```
/// use marginalia_core::SummaryRecord;
///
/// let record = SummaryRecord::builder()
///     .title("Rust (programming language)")
///     .description("General-purpose programming language")
///     .extract("Rust is a general-purpose programming language.")
///     .short_extract("Rust is a general-purpose programming language.")
///     .canonical_url(Some("https://en.wikipedia.org/wiki/Rust".to_string()))
///     .timestamp("2024-03-05T10:00:00Z")
///     .build()
///     .unwrap();
///
/// assert!(!record.is_degraded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct SummaryRecord {
    /// Display title of the page
    title: String,
    /// One-line description
    #[builder(default)]
    description: String,
    /// Long-form extract
    extract: String,
    /// Extract limited to its first paragraph
    #[builder(default)]
    short_extract: String,
    /// Thumbnail image URL
    #[builder(default)]
    thumbnail_url: Option<String>,
    /// Canonical page URL
    #[builder(default)]
    canonical_url: Option<String>,
    /// Last-modified timestamp (RFC 3339)
    #[builder(default)]
    timestamp: String,
    /// Set when this record is a placeholder for a failed fetch
    #[builder(default)]
    #[getter(skip)]
    is_degraded: bool,
}

impl SummaryRecord {
    /// Start building a record.
    pub fn builder() -> SummaryRecordBuilder {
        SummaryRecordBuilder::default()
    }

    /// Placeholder record for a subject whose fetch failed.
    pub fn degraded(topic: &str) -> Self {
        let text = format!("Information about {} is currently unavailable.", topic);
        Self {
            title: topic.to_string(),
            description: "Information unavailable".to_string(),
            extract: text.clone(),
            short_extract: text,
            thumbnail_url: None,
            canonical_url: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            is_degraded: true,
        }
    }

    /// Whether this record is a placeholder for a failed fetch.
    pub fn is_degraded(&self) -> bool {
        self.is_degraded
    }
}

/// A ranked candidate from a search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_new::new)]
pub struct SearchHit {
    /// Page title
    title: String,
    /// Short description, empty when the service has none
    description: String,
    /// Page URL
    url: String,
}
