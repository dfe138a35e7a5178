//! Reference lookup error types.

/// Specific error conditions for reference lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum LookupErrorKind {
    /// The subject has no page
    #[display("No page found for '{}'", _0)]
    NotFound(String),
    /// Request could not be sent or the connection failed
    #[display("Lookup request failed: {}", _0)]
    Http(String),
    /// The service answered with a non-success status
    #[display("Lookup service returned status {}", _0)]
    Status(u16),
    /// The response body could not be decoded
    #[display("Failed to decode lookup response: {}", _0)]
    Decode(String),
    /// The subject normalized to an empty string
    #[display("Topic is empty after normalization")]
    EmptyTopic,
}

impl LookupErrorKind {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            LookupErrorKind::Http(_) => true,
            LookupErrorKind::Status(code) => *code == 429 || *code >= 500,
            LookupErrorKind::NotFound(_)
            | LookupErrorKind::Decode(_)
            | LookupErrorKind::EmptyTopic => false,
        }
    }
}

/// Error type for reference lookups.
///
/// # Examples
///
/// ```
/// use marginalia_error::{LookupError, LookupErrorKind};
///
/// let err = LookupError::new(LookupErrorKind::Status(503));
/// assert!(err.kind.is_transient());
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Lookup Error: {} at line {} in {}", kind, line, file)]
pub struct LookupError {
    /// The specific error condition
    pub kind: LookupErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl LookupError {
    /// Create a new LookupError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LookupErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
