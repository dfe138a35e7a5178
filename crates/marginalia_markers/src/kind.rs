//! The closed set of marker names the catalog understands.

use crate::SplitPolicy;
use std::str::FromStr;

/// A marker behavior.
///
/// Names outside this set are unknown markers and are left in the document
/// as written.
///
/// # Examples
///
/// ```
/// use marginalia_markers::MarkerKind;
///
/// assert_eq!(MarkerKind::parse("ai_link"), Some(MarkerKind::Link));
/// assert_eq!(MarkerKind::parse("ai_bogus"), None);
/// assert_eq!(MarkerKind::Answer.to_string(), "ai_answer");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum MarkerKind {
    /// Single most salient fact about a topic
    #[strum(serialize = "ai_fact")]
    Fact,
    /// One-sentence description of a topic
    #[strum(serialize = "ai_describe")]
    Describe,
    /// Sentence or template rewritten around a fact
    #[strum(serialize = "ai_rewrite")]
    Rewrite,
    /// Pass-through wrapper for nested content
    #[strum(serialize = "ai_complete")]
    Complete,
    /// Short grounded paragraph
    #[strum(serialize = "ai_paragraph")]
    Paragraph,
    /// One-sentence condensation
    #[strum(serialize = "ai_summary")]
    Summary,
    /// Answer to a question, optionally grounded in a topic
    #[strum(serialize = "ai_answer")]
    Answer,
    /// Canonical URL for a topic
    #[strum(serialize = "ai_link")]
    Link,
    /// Last-modified date of a topic's page
    #[strum(serialize = "ai_updated")]
    Updated,
}

impl MarkerKind {
    /// Look up a marker name; `None` for unknown markers.
    pub fn parse(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }

    /// Whether the second parameter is free text that may contain colons.
    pub fn is_content_preserving(self) -> bool {
        matches!(self, Self::Answer | Self::Rewrite | Self::Complete)
    }

    /// Parameter splitting rule for this marker.
    pub fn split_policy(self) -> SplitPolicy {
        if self.is_content_preserving() {
            SplitPolicy::FirstColon
        } else {
            SplitPolicy::EveryColon
        }
    }
}
