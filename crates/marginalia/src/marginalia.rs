//! The assembled system.

use crate::MarginaliaConfig;
use marginalia_core::LoadProgress;
use marginalia_error::{GenerationError, GenerationErrorKind, MarginaliaResult};
use marginalia_interface::{ReferenceLookup, TextGenerator};
use marginalia_lookup::WikipediaClient;
use marginalia_markers::{Engine, HandlerCatalog, ResolutionReport, SubstitutionValue};
use marginalia_models::{ServerLoader, SharedGenerator};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument};

/// A marker engine wired to its lookup and generator collaborators.
pub struct Marginalia {
    engine: Engine<HandlerCatalog>,
    lookup: Arc<dyn ReferenceLookup>,
    generator: Option<Arc<SharedGenerator>>,
}

impl Marginalia {
    /// Build the Wikipedia client, the shared generator (when enabled) and
    /// the engine from configuration.
    ///
    /// The generator is created unloaded; it loads on first use or on
    /// [`init_generator`](Self::init_generator).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be constructed.
    #[instrument(skip(config))]
    pub fn from_config(config: &MarginaliaConfig) -> MarginaliaResult<Self> {
        config.validate()?;

        let lookup: Arc<dyn ReferenceLookup> =
            Arc::new(WikipediaClient::new(config.lookup.clone())?);

        let generator = config.generator.enabled().then(|| {
            let loader = Arc::new(ServerLoader::new(config.generator.clone()));
            Arc::new(SharedGenerator::new(loader, config.generator.model()))
        });

        info!(
            generative = generator.is_some(),
            max_iterations = config.engine.max_iterations(),
            "Marginalia configured"
        );
        Ok(Self::new(lookup, generator, config))
    }

    /// Assemble from existing collaborators.
    ///
    /// Fallback links use `config.lookup.page_url`.
    pub fn new(
        lookup: Arc<dyn ReferenceLookup>,
        generator: Option<Arc<SharedGenerator>>,
        config: &MarginaliaConfig,
    ) -> Self {
        let catalog_config = config
            .catalog
            .clone()
            .with_page_url(config.lookup.page_url().as_str());
        let catalog = HandlerCatalog::new(
            Arc::clone(&lookup),
            generator
                .clone()
                .map(|g| g as Arc<dyn TextGenerator>),
            catalog_config,
        );
        Self {
            engine: Engine::new(catalog, config.engine),
            lookup,
            generator,
        }
    }

    /// Resolve every marker in `document`.
    pub async fn resolve(
        &self,
        document: &str,
        substitutions: &[(&str, SubstitutionValue)],
    ) -> String {
        self.engine.resolve(document, substitutions).await
    }

    /// Resolve and report how the resolution loop ended.
    pub async fn resolve_with_report(
        &self,
        document: &str,
        substitutions: &[(&str, SubstitutionValue)],
    ) -> ResolutionReport {
        self.engine.resolve_with_report(document, substitutions).await
    }

    /// Drop every cached lookup record.
    pub async fn clear_cache(&self) {
        self.lookup.clear_cache().await;
    }

    /// Switch the generative model. The next generative marker reloads.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator is disabled.
    pub async fn set_model(&self, model: &str) -> MarginaliaResult<()> {
        self.shared_generator()?.set_model(model).await;
        Ok(())
    }

    /// Load the generative model now instead of on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator is disabled or fails to load.
    pub async fn init_generator(&self) -> MarginaliaResult<()> {
        self.shared_generator()?.init().await
    }

    /// Model load progress, when the generator is enabled.
    pub fn subscribe_progress(&self) -> Option<watch::Receiver<LoadProgress>> {
        self.generator.as_ref().map(|g| g.subscribe_progress())
    }

    /// The underlying engine.
    pub fn engine(&self) -> &Engine<HandlerCatalog> {
        &self.engine
    }

    /// The shared generator, when enabled.
    pub fn generator(&self) -> Option<&Arc<SharedGenerator>> {
        self.generator.as_ref()
    }

    fn shared_generator(&self) -> MarginaliaResult<&SharedGenerator> {
        self.generator
            .as_deref()
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::NotInitialized).into())
    }
}

impl std::fmt::Debug for Marginalia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marginalia")
            .field("engine", &self.engine)
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}
