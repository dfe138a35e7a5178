//! Innermost marker discovery.

use derive_getters::Getters;

/// A marker found in a document.
///
/// `span` is the exact matched text. Replacement is done by substring so
/// identical occurrences share one result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct MarkerOccurrence {
    /// Marker name, e.g. `ai_fact`
    name: String,
    /// Text after the first colon; `None` for bare markers
    raw_params: Option<String>,
    /// Full matched text including delimiters
    span: String,
}

impl MarkerOccurrence {
    fn parse(inner: &str, span: &str) -> Option<Self> {
        let (name, raw_params) = match inner.split_once(':') {
            Some((name, params)) => (name, Some(params.to_string())),
            None => (inner, None),
        };
        if !is_marker_name(name) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            raw_params,
            span: span.to_string(),
        })
    }

    /// Raw parameter text, empty for bare markers.
    pub fn params_text(&self) -> &str {
        self.raw_params.as_deref().unwrap_or_default()
    }
}

fn is_marker_name(name: &str) -> bool {
    name.strip_prefix("ai_").is_some_and(|rest| {
        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

/// Find every innermost marker, left to right.
///
/// A candidate runs from the last `{{` before a `}}` to that `}}`, so its
/// body never contains another delimiter pair. Outer markers become
/// visible once their inner markers have been replaced.
///
/// # Examples
///
/// ```
/// use marginalia_markers::scan;
///
/// let found = scan("{{ai_complete:A {{ai_link:Rust}} B}}");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].span(), "{{ai_link:Rust}}");
/// ```
pub fn scan(document: &str) -> Vec<MarkerOccurrence> {
    let bytes = document.as_bytes();
    let mut found = Vec::new();
    let mut open: Option<usize> = None;
    let mut i = 0;

    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'{', b'{') => {
                open = Some(i);
                i += 1;
            }
            (b'}', b'}') => match open.take() {
                Some(start) => {
                    let end = i + 2;
                    if let Some(marker) =
                        MarkerOccurrence::parse(&document[start + 2..i], &document[start..end])
                    {
                        found.push(marker);
                    }
                    i = end;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(doc: &str) -> Vec<String> {
        scan(doc).into_iter().map(|m| m.span).collect()
    }

    #[test]
    fn test_no_markers() {
        assert!(scan("").is_empty());
        assert!(scan("plain text with {single} braces").is_empty());
        assert!(scan("{{name}} is not a marker").is_empty());
    }

    #[test]
    fn test_parameterized_and_bare() {
        let found = scan("{{ai_fact:Rust}} and {{ai_updated}}");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name(), "ai_fact");
        assert_eq!(found[0].raw_params().as_deref(), Some("Rust"));
        assert_eq!(found[1].name(), "ai_updated");
        assert_eq!(found[1].raw_params(), &None);
        assert_eq!(found[1].params_text(), "");
    }

    #[test]
    fn test_empty_params_after_colon() {
        let found = scan("{{ai_fact:}}");
        assert_eq!(found[0].raw_params().as_deref(), Some(""));
    }

    #[test]
    fn test_innermost_only() {
        assert_eq!(
            spans("{{ai_complete:A {{ai_link:Topic}} B}}"),
            vec!["{{ai_link:Topic}}"]
        );
    }

    #[test]
    fn test_siblings_inside_outer() {
        assert_eq!(
            spans("{{ai_complete:{{ai_fact:A}} and {{ai_fact:B}}}}"),
            vec!["{{ai_fact:A}}", "{{ai_fact:B}}"]
        );
    }

    #[test]
    fn test_params_keep_colons_and_single_braces() {
        let found = scan("{{ai_answer:Rust:Is {this} valid: yes?}}");
        assert_eq!(found[0].params_text(), "Rust:Is {this} valid: yes?");
    }

    #[test]
    fn test_invalid_names_skipped() {
        assert!(scan("{{ai_:x}} {{ai-fact:x}} {{fact:x}} {{ai_fact x}}").is_empty());
    }

    #[test]
    fn test_unterminated_marker() {
        assert!(scan("{{ai_fact:Rust").is_empty());
        assert_eq!(spans("{{ai_fact:Rust {{ai_link:Go}}"), vec!["{{ai_link:Go}}"]);
    }

    #[test]
    fn test_extra_braces() {
        assert_eq!(spans("{{{ai_fact:X}}}"), vec!["{{ai_fact:X}}"]);
    }

    #[test]
    fn test_duplicates_reported_in_order() {
        assert_eq!(
            spans("{{ai_link:A}} {{ai_link:B}} {{ai_link:A}}"),
            vec!["{{ai_link:A}}", "{{ai_link:B}}", "{{ai_link:A}}"]
        );
    }

    #[test]
    fn test_unicode_text_around_markers() {
        assert_eq!(spans("café {{ai_fact:Zürich}} ✓"), vec!["{{ai_fact:Zürich}}"]);
    }
}
