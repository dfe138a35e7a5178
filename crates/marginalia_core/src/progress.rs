//! Model load progress reporting.

use serde::{Deserialize, Serialize};

/// Lifecycle stage of the shared generative model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display)]
pub enum LoadStatus {
    /// Nothing loaded yet
    #[display("idle")]
    Idle,
    /// Load started
    #[display("loading")]
    Loading,
    /// Model weights are being fetched
    #[display("downloading {}/{}", loaded, total)]
    Downloading {
        /// Bytes received
        loaded: u64,
        /// Total bytes expected
        total: u64,
    },
    /// Model is ready for inference
    #[display("ready")]
    Ready,
    /// Load failed
    #[display("failed: {}", _0)]
    Failed(String),
}

/// Progress event for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[display("{}: {}", model, status)]
pub struct LoadProgress {
    /// Model identifier
    pub model: String,
    /// Current stage
    pub status: LoadStatus,
}

impl LoadProgress {
    /// Create a progress event.
    pub fn new(model: impl Into<String>, status: LoadStatus) -> Self {
        Self {
            model: model.into(),
            status,
        }
    }

    /// Fraction complete in `[0, 1]` while downloading.
    pub fn fraction(&self) -> Option<f64> {
        match self.status {
            LoadStatus::Downloading { loaded, total } if total > 0 => {
                Some((loaded as f64 / total as f64).min(1.0))
            }
            LoadStatus::Ready => Some(1.0),
            _ => None,
        }
    }
}
