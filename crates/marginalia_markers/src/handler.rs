//! The seam between the engine and marker behaviors.

use crate::MarkerKind;
use async_trait::async_trait;
use derive_getters::Getters;
use marginalia_error::MarginaliaResult;

/// One marker dispatch: its kind, raw parameter text and split parameters.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MarkerCall {
    kind: MarkerKind,
    raw_params: String,
    params: Vec<String>,
}

impl MarkerCall {
    /// Create a call. `params` should come from
    /// [`split_params`](crate::split_params) with the kind's policy.
    pub fn new(kind: MarkerKind, raw_params: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            kind,
            raw_params: raw_params.into(),
            params,
        }
    }

    /// Parameter `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

/// Produces the replacement text for a known marker.
///
/// Returning an error leaves the marker in the document unchanged.
#[async_trait]
pub trait MarkerHandler: Send + Sync {
    /// Resolve one marker call.
    async fn handle(&self, call: &MarkerCall) -> MarginaliaResult<String>;
}

#[async_trait]
impl<H: MarkerHandler + ?Sized> MarkerHandler for std::sync::Arc<H> {
    async fn handle(&self, call: &MarkerCall) -> MarginaliaResult<String> {
        (**self).handle(call).await
    }
}
