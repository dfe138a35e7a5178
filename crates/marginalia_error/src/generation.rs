//! Generative backend error types.

/// Error kinds for text generation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// No model has been loaded
    #[display("Generator is not initialized")]
    NotInitialized,
    /// Loading the model failed
    #[display("Failed to load model: {}", _0)]
    Load(String),
    /// HTTP request failed
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// Backend reported an error
    #[display("API error: {}", _0)]
    Api(String),
    /// Failed to deserialize response
    #[display("Failed to deserialize response: {}", _0)]
    Deserialization(String),
    /// Backend returned no usable text
    #[display("Generator returned empty output")]
    EmptyOutput,
}

/// Error wrapper with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The error kind
    pub kind: GenerationErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
