//! Configuration for the generative backend connection

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Connection settings for an OpenAI-compatible inference server.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_", into)]
#[builder(setter(into))]
pub struct GeneratorConfig {
    /// Use the generative backend at all; handlers fall back to
    /// non-generative text when disabled
    #[serde(default = "default_enabled")]
    #[builder(default = "default_enabled()")]
    enabled: bool,
    /// Base URL of the server (e.g., "http://localhost:8080")
    #[serde(default = "default_base_url")]
    #[builder(default = "default_base_url()")]
    base_url: String,
    /// Model identifier to use for inference
    #[serde(default = "default_model")]
    #[builder(default = "default_model()")]
    model: String,
    /// Optional bearer token
    #[serde(default)]
    #[builder(default)]
    api_key: Option<String>,
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    #[builder(default = "default_timeout_secs()")]
    timeout_secs: u64,
    /// Probe `/health` while loading
    #[serde(default = "default_verify_health")]
    #[builder(default = "default_verify_health()")]
    verify_health: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_model() -> String {
    "qwen2.5-0.5b-instruct".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_verify_health() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            verify_health: default_verify_health(),
        }
    }
}
