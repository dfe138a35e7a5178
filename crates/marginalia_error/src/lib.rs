//! Error types for the marginalia workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use marginalia_error::{LookupError, LookupErrorKind, MarginaliaResult};
//!
//! fn fetch() -> MarginaliaResult<String> {
//!     Err(LookupError::new(LookupErrorKind::NotFound("Rust".to_string())))?
//! }
//!
//! assert!(fetch().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod http;
mod json;
mod lookup;
mod marker;

pub use config::ConfigError;
pub use error::{MarginaliaError, MarginaliaErrorKind, MarginaliaResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use lookup::{LookupError, LookupErrorKind};
pub use marker::{MarkerError, MarkerErrorKind};
