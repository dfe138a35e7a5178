//! Top-level error wrapper types.

use crate::{ConfigError, GenerationError, HttpError, JsonError, LookupError, MarkerError};

/// Every error condition the workspace can raise.
///
/// # Examples
///
/// ```
/// use marginalia_error::{MarginaliaError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: MarginaliaError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MarginaliaErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Reference lookup error
    #[from(LookupError)]
    Lookup(LookupError),
    /// Generative backend error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Marker handler error
    #[from(MarkerError)]
    Marker(MarkerError),
}

/// Marginalia error with kind discrimination.
///
/// # Examples
///
/// ```
/// use marginalia_error::{MarginaliaResult, ConfigError};
///
/// fn might_fail() -> MarginaliaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Marginalia Error: {}", _0)]
pub struct MarginaliaError(Box<MarginaliaErrorKind>);

impl MarginaliaError {
    /// Create a new error from a kind.
    pub fn new(kind: MarginaliaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MarginaliaErrorKind {
        &self.0
    }
}

impl<T> From<T> for MarginaliaError
where
    T: Into<MarginaliaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for marginalia operations.
pub type MarginaliaResult<T> = std::result::Result<T, MarginaliaError>;
