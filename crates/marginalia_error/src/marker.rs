//! Marker resolution error types.

/// Specific error conditions raised while resolving a single marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MarkerErrorKind {
    /// Marker name is not in the handler catalog
    #[display("Unknown marker '{}'", _0)]
    UnknownMarker(String),
    /// Handler was called with too few parameters
    #[display("Marker '{}' expects {} parameter(s), got {}", marker, expected, got)]
    MissingParameter {
        /// Marker name
        marker: String,
        /// Minimum parameter count
        expected: usize,
        /// Parameters supplied
        got: usize,
    },
    /// Handler failed internally
    #[display("Handler for '{}' failed: {}", marker, message)]
    Handler {
        /// Marker name
        marker: String,
        /// Error message
        message: String,
    },
}

/// Error type for marker handlers.
///
/// # Examples
///
/// ```
/// use marginalia_error::{MarkerError, MarkerErrorKind};
///
/// let err = MarkerError::new(MarkerErrorKind::UnknownMarker("ai_bogus".into()));
/// assert!(format!("{}", err).contains("ai_bogus"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Marker Error: {} at line {} in {}", kind, line, file)]
pub struct MarkerError {
    /// The specific error condition
    pub kind: MarkerErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl MarkerError {
    /// Create a new MarkerError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MarkerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
