//! Parameter splitting.

use serde::{Deserialize, Serialize};

/// How raw marker parameters are split into a parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum SplitPolicy {
    /// Split at the first colon only; the remainder may contain colons.
    #[strum(serialize = "first-colon")]
    FirstColon,
    /// Split at every colon.
    #[strum(serialize = "every-colon")]
    EveryColon,
}

/// Split raw parameter text. Every part is trimmed.
///
/// Empty raw text yields no parameters.
///
/// # Examples
///
/// ```
/// use marginalia_markers::{SplitPolicy, split_params};
///
/// assert_eq!(
///     split_params("Topic:This has: colons", SplitPolicy::FirstColon),
///     vec!["Topic", "This has: colons"]
/// );
/// assert_eq!(split_params("a:b:c", SplitPolicy::EveryColon), vec!["a", "b", "c"]);
/// assert!(split_params("", SplitPolicy::EveryColon).is_empty());
/// ```
pub fn split_params(raw: &str, policy: SplitPolicy) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    match policy {
        SplitPolicy::FirstColon => match raw.split_once(':') {
            Some((head, tail)) => vec![head.trim().to_string(), tail.trim().to_string()],
            None => vec![raw.trim().to_string()],
        },
        SplitPolicy::EveryColon => raw.split(':').map(|s| s.trim().to_string()).collect(),
    }
}
