//! Engine and catalog settings.

use derive_getters::Getters;
use marginalia_error::ConfigError;
use serde::{Deserialize, Serialize};

/// Resolution loop settings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(setter(into))]
pub struct EngineConfig {
    /// Maximum scan/resolve iterations per document
    #[serde(default = "default_max_iterations")]
    #[builder(default = "default_max_iterations()")]
    max_iterations: usize,
}

fn default_max_iterations() -> usize {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

impl EngineConfig {
    /// Reject settings the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iterations` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::new("engine.max_iterations must be at least 1"));
        }
        Ok(())
    }
}

/// Handler catalog settings.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_", into)]
#[builder(setter(into))]
pub struct CatalogConfig {
    /// Length of truncated-extract fallbacks (characters)
    #[serde(default = "default_fallback_truncate_chars")]
    #[builder(default = "default_fallback_truncate_chars()")]
    fallback_truncate_chars: usize,
    /// Base for fallback links; the normalized topic is appended
    #[serde(default = "default_page_url")]
    #[builder(default = "default_page_url()")]
    page_url: String,
    /// Sampling temperature for generative handlers
    #[serde(default = "default_temperature")]
    #[builder(default = "default_temperature()")]
    temperature: f32,
    /// Greedy decoding for every generative handler
    #[serde(default)]
    #[builder(default)]
    deterministic: bool,
}

fn default_fallback_truncate_chars() -> usize {
    200
}

fn default_page_url() -> String {
    "https://en.wikipedia.org/wiki/".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fallback_truncate_chars: default_fallback_truncate_chars(),
            page_url: default_page_url(),
            temperature: default_temperature(),
            deterministic: false,
        }
    }
}

impl CatalogConfig {
    /// Reject settings the catalog cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero truncation length or an out-of-range
    /// temperature.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_truncate_chars == 0 {
            return Err(ConfigError::new(
                "catalog.fallback_truncate_chars must be at least 1",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::new(format!(
                "catalog.temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}
