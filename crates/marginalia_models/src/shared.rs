//! Shared generator lifecycle.

use async_trait::async_trait;
use marginalia_core::{GenerateRequest, GenerateResponse, LoadProgress, LoadStatus};
use marginalia_error::MarginaliaResult;
use marginalia_interface::{GeneratorLoader, ProgressSink, TextGenerator};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

struct Slot {
    model: String,
    generator: Option<Arc<dyn TextGenerator>>,
}

/// The single model instance shared by every marker handler.
///
/// The instance is created lazily on first use. Concurrent callers that
/// arrive while a load is in flight wait on the slot lock and reuse the
/// result, so a model is never loaded twice. Inference calls are serialized
/// through a second lock.
///
/// Progress is published on a watch channel; see
/// [`subscribe_progress`](Self::subscribe_progress).
pub struct SharedGenerator {
    loader: Arc<dyn GeneratorLoader>,
    slot: Mutex<Slot>,
    inference: Mutex<()>,
    progress: Arc<watch::Sender<LoadProgress>>,
}

impl SharedGenerator {
    /// Create an unloaded generator for `model`.
    pub fn new(loader: Arc<dyn GeneratorLoader>, model: impl Into<String>) -> Self {
        let model = model.into();
        let (progress, _) = watch::channel(LoadProgress::new(model.clone(), LoadStatus::Idle));
        Self {
            loader,
            slot: Mutex::new(Slot {
                model,
                generator: None,
            }),
            inference: Mutex::new(()),
            progress: Arc::new(progress),
        }
    }

    /// Load the current model if it is not loaded yet.
    ///
    /// Idempotent. A failed load leaves the generator unloaded so the next
    /// call tries again.
    ///
    /// # Errors
    ///
    /// Returns the loader's error.
    #[instrument(skip(self))]
    pub async fn init(&self) -> MarginaliaResult<()> {
        self.ready().await.map(|_| ())
    }

    async fn ready(&self) -> MarginaliaResult<Arc<dyn TextGenerator>> {
        let mut slot = self.slot.lock().await;
        if let Some(generator) = &slot.generator {
            return Ok(Arc::clone(generator));
        }

        let model = slot.model.clone();
        info!(model = %model, "Loading generator");
        self.publish(LoadProgress::new(model.clone(), LoadStatus::Loading));

        let sender = Arc::clone(&self.progress);
        let sink: ProgressSink = Arc::new(move |event: LoadProgress| {
            sender.send_replace(event);
        });

        match self.loader.load(&model, sink).await {
            Ok(generator) => {
                slot.generator = Some(Arc::clone(&generator));
                self.publish(LoadProgress::new(model, LoadStatus::Ready));
                Ok(generator)
            }
            Err(e) => {
                warn!(model = %model, error = %e, "Generator load failed");
                self.publish(LoadProgress::new(model, LoadStatus::Failed(e.to_string())));
                Err(e)
            }
        }
    }

    /// Switch to another model. The next use reloads.
    #[instrument(skip(self))]
    pub async fn set_model(&self, model: &str) {
        let mut slot = self.slot.lock().await;
        if slot.model == model && slot.generator.is_some() {
            debug!("Model unchanged, keeping loaded instance");
            return;
        }
        slot.model = model.to_string();
        slot.generator = None;
        self.publish(LoadProgress::new(model, LoadStatus::Idle));
    }

    /// Release the loaded instance.
    pub async fn dispose(&self) {
        let mut slot = self.slot.lock().await;
        if slot.generator.take().is_some() {
            info!(model = %slot.model, "Generator disposed");
        }
        self.publish(LoadProgress::new(slot.model.clone(), LoadStatus::Idle));
    }

    /// Model identifier that is (or will be) loaded.
    pub async fn current_model(&self) -> String {
        self.slot.lock().await.model.clone()
    }

    /// Whether an instance is loaded.
    pub async fn is_ready(&self) -> bool {
        self.slot.lock().await.generator.is_some()
    }

    /// Receive load progress events. The current state is available
    /// immediately through `borrow()`.
    pub fn subscribe_progress(&self) -> watch::Receiver<LoadProgress> {
        self.progress.subscribe()
    }

    fn publish(&self, event: LoadProgress) {
        debug!(progress = %event, "Load progress");
        self.progress.send_replace(event);
    }
}

impl std::fmt::Debug for SharedGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedGenerator")
            .field("progress", &*self.progress.borrow())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TextGenerator for SharedGenerator {
    #[instrument(skip(self, req))]
    async fn generate(&self, req: &GenerateRequest) -> MarginaliaResult<GenerateResponse> {
        let generator = self.ready().await?;
        let _turn = self.inference.lock().await;
        generator.generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        "shared"
    }

    fn model_name(&self) -> String {
        self.progress.borrow().model.clone()
    }
}
