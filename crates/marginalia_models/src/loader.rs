//! Loader producing server-backed generators.

use crate::{GeneratorConfig, ServerClient};
use async_trait::async_trait;
use marginalia_core::{LoadProgress, LoadStatus};
use marginalia_error::{GenerationError, GenerationErrorKind, MarginaliaResult};
use marginalia_interface::{GeneratorLoader, ProgressSink, TextGenerator};
use std::sync::Arc;
use tracing::{info, instrument};

/// Builds a [`ServerClient`] bound to the requested model.
///
/// The model itself lives in the inference server, so "loading" means
/// confirming the server answers its health probe.
#[derive(Debug, Clone)]
pub struct ServerLoader {
    config: GeneratorConfig,
}

impl ServerLoader {
    /// Create a loader sharing connection settings across models.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl GeneratorLoader for ServerLoader {
    #[instrument(skip(self, progress))]
    async fn load(
        &self,
        model: &str,
        progress: ProgressSink,
    ) -> MarginaliaResult<Arc<dyn TextGenerator>> {
        progress(LoadProgress::new(model, LoadStatus::Loading));

        let config = self.config.clone().with_model(model);
        let client = ServerClient::new(config)?;

        if *self.config.verify_health() {
            client.health_check().await.map_err(|e| {
                GenerationError::new(GenerationErrorKind::Load(format!(
                    "Server for '{}' is not reachable: {}",
                    model, e.kind
                )))
            })?;
        }

        info!(model, "Generator ready");
        Ok(Arc::new(client))
    }
}
