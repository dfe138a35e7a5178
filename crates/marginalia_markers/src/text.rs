//! Text heuristics shared by the handlers.

use regex::Regex;
use std::sync::LazyLock;

/// Longest first-sentence fallback returned by [`extract_key_info`].
const KEY_INFO_MAX_CHARS: usize = 100;

static KEY_INFO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\d+(?:[.,]\d+)*\s*(?:million|billion|trillion)(?:\s+(?:users|people|dollars|downloads))?",
        r"\d+(?:\.\d+)?\s?%",
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}\b",
        r"\b\d{4}\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid key info regex"))
    .collect()
});

static LEADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:answer|fact|description|summary|paragraph|rewritten sentence|rewrite|sentence|result|output)\s*:\s*",
    )
    .expect("Invalid label regex")
});

/// Pull the most salient figure out of a passage.
///
/// Patterns are tried in priority order: a quantity with a scale word
/// (optionally followed by a unit noun), a percentage, a month and year,
/// then a bare year. The first match of the first matching pattern wins.
/// Without a match the text before the first `.`, `!` or `?` is returned,
/// cut to 100 characters.
///
/// # Examples
///
/// ```
/// use marginalia_markers::extract_key_info;
///
/// assert_eq!(
///     extract_key_info("The population reached 8.1 billion people in 2023."),
///     "8.1 billion people"
/// );
/// assert_eq!(extract_key_info("Rust 1.0 shipped in May 2015."), "May 2015");
/// assert_eq!(extract_key_info("Rust is a language. It is fast."), "Rust is a language");
/// ```
pub fn extract_key_info(text: &str) -> String {
    KEY_INFO_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| truncate_chars(leading_clause(text), KEY_INFO_MAX_CHARS))
}

/// Text before the first `.`, `!` or `?`, without the delimiter.
fn leading_clause(text: &str) -> &str {
    let text = text.trim();
    text.split(['.', '!', '?']).next().unwrap_or(text).trim()
}

/// Text up to and including the first sentence terminator.
///
/// A terminator is `.`, `!` or `?` followed by whitespace or the end of the
/// text, so decimals such as `8.1` do not end a sentence.
pub fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            match chars.peek() {
                None => return text,
                Some((_, next)) if next.is_whitespace() => return &text[..i + c.len_utf8()],
                _ => {}
            }
        }
    }
    text
}

/// Cut `text` to at most `max_chars` characters, appending `...` when cut.
///
/// # Examples
///
/// ```
/// use marginalia_markers::truncate_chars;
///
/// assert_eq!(truncate_chars("short", 10), "short");
/// assert_eq!(truncate_chars("abcdefgh", 3), "abc...");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// Normalize raw generator output.
///
/// Trims, drops a leading label such as `Answer:`, strips wrapping quotes
/// and collapses whitespace. Returns `None` when nothing is left.
///
/// # Examples
///
/// ```
/// use marginalia_markers::clean_generated;
///
/// assert_eq!(
///     clean_generated("  Answer: \"Rust was   first released in 2015.\"\n").as_deref(),
///     Some("Rust was first released in 2015.")
/// );
/// assert_eq!(clean_generated(" \"\" "), None);
/// ```
pub fn clean_generated(raw: &str) -> Option<String> {
    let text = raw.trim();
    let text = LEADING_LABEL.replace(text, "");
    let text = strip_wrapping_quotes(text.trim());
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn strip_wrapping_quotes(text: &str) -> &str {
    const PAIRS: [(char, char); 3] = [('"', '"'), ('\'', '\''), ('\u{201c}', '\u{201d}')];
    for (open, close) in PAIRS {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    text
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '\''
}

/// Byte offsets of every standalone `X` placeholder in a template.
fn template_slots(template: &str) -> Vec<usize> {
    let chars: Vec<(usize, char)> = template.char_indices().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(n, (_, c))| {
            *c == 'X'
                && (*n == 0 || !is_word_char(chars[n - 1].1))
                && chars.get(n + 1).is_none_or(|(_, next)| !is_word_char(*next))
        })
        .map(|(_, (i, _))| *i)
        .collect()
}

/// Whether a rewrite argument is a template with an `X` placeholder.
pub(crate) fn is_template(text: &str) -> bool {
    !template_slots(text).is_empty()
}

/// Replace every standalone `X` in `template` with `value`.
pub(crate) fn fill_template(template: &str, value: &str) -> String {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut last = 0;
    for slot in template_slots(template) {
        out.push_str(&template[last..slot]);
        out.push_str(value);
        last = slot + 1;
    }
    out.push_str(&template[last..]);
    out
}
