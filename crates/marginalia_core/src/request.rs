//! Request and response types for text generation.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Sampling controls for a single completion.
///
/// # Examples
///
/// ```
/// use marginalia_core::SamplingOptions;
///
/// let options = SamplingOptions::default()
///     .with_max_new_tokens(60)
///     .with_temperature(0.3)
///     .with_deterministic(true);
///
/// assert_eq!(*options.max_new_tokens(), 60);
/// assert!(*options.deterministic());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct SamplingOptions {
    /// Maximum number of tokens to generate
    max_new_tokens: u32,
    /// Sampling temperature; ignored when `deterministic` is set
    temperature: f32,
    /// Greedy decoding instead of sampling
    deterministic: bool,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            max_new_tokens: 100,
            temperature: 0.7,
            deterministic: false,
        }
    }
}

impl SamplingOptions {
    /// Temperature actually sent to the backend.
    pub fn effective_temperature(&self) -> f32 {
        if self.deterministic {
            0.0
        } else {
            self.temperature
        }
    }
}

/// A single text-completion request.
///
/// # Examples
///
/// ```
/// use marginalia_core::{GenerateRequest, SamplingOptions};
///
/// let request = GenerateRequest::builder()
///     .prompt("Summarize: Rust is a language.")
///     .options(SamplingOptions::default().with_max_new_tokens(40))
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.options().max_new_tokens(), 40);
/// assert!(request.model().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// Instruction text
    prompt: String,
    /// Sampling controls
    #[builder(default)]
    options: SamplingOptions,
    /// Model override; the backend's current model is used when absent
    #[builder(default)]
    model: Option<String>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// Text produced by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct GenerateResponse {
    /// Generated text, untrimmed
    text: String,
}

impl GenerateResponse {
    /// Consume the response and return its text.
    pub fn into_text(self) -> String {
        self.text
    }
}
