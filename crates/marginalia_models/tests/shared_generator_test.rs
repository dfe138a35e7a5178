//! Tests for the shared generator lifecycle.

use async_trait::async_trait;
use marginalia_core::{GenerateRequest, GenerateResponse, LoadProgress, LoadStatus};
use marginalia_error::{GenerationError, GenerationErrorKind, MarginaliaResult};
use marginalia_interface::{GeneratorLoader, ProgressSink, TextGenerator};
use marginalia_models::SharedGenerator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Generator that records how many calls overlap.
struct EchoGenerator {
    model: String,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, req: &GenerateRequest) -> MarginaliaResult<GenerateResponse> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(GenerateResponse::new(format!("{}: {}", self.model, req.prompt())))
    }

    fn provider_name(&self) -> &'static str {
        "echo"
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}

/// Loader that counts loads and optionally fails the first N.
struct CountingLoader {
    loads: Arc<AtomicUsize>,
    fail_first: usize,
    max_active: Arc<AtomicUsize>,
    models: Arc<Mutex<Vec<String>>>,
}

impl CountingLoader {
    fn new(fail_first: usize) -> Self {
        Self {
            loads: Arc::new(AtomicUsize::new(0)),
            fail_first,
            max_active: Arc::new(AtomicUsize::new(0)),
            models: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl GeneratorLoader for CountingLoader {
    async fn load(
        &self,
        model: &str,
        progress: ProgressSink,
    ) -> MarginaliaResult<Arc<dyn TextGenerator>> {
        let attempt = self.loads.fetch_add(1, Ordering::SeqCst);
        self.models.lock().unwrap().push(model.to_string());
        progress(LoadProgress::new(
            model,
            LoadStatus::Downloading {
                loaded: 50,
                total: 100,
            },
        ));
        tokio::time::sleep(Duration::from_millis(30)).await;
        if attempt < self.fail_first {
            return Err(GenerationError::new(GenerationErrorKind::Load("weights missing".into())).into());
        }
        Ok(Arc::new(EchoGenerator {
            model: model.to_string(),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::clone(&self.max_active),
        }))
    }
}

fn request(prompt: &str) -> GenerateRequest {
    GenerateRequest::builder().prompt(prompt).build().unwrap()
}

#[tokio::test]
async fn test_concurrent_init_loads_once() {
    let loader = Arc::new(CountingLoader::new(0));
    let loads = Arc::clone(&loader.loads);
    let generator = Arc::new(SharedGenerator::new(loader, "tiny"));

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let generator = Arc::clone(&generator);
            tokio::spawn(async move { generator.init().await })
        })
        .collect();
    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(generator.is_ready().await);
}

#[tokio::test]
async fn test_generate_initializes_lazily() {
    let loader = Arc::new(CountingLoader::new(0));
    let loads = Arc::clone(&loader.loads);
    let generator = SharedGenerator::new(loader, "tiny");

    assert!(!generator.is_ready().await);
    let response = generator.generate(&request("hi")).await.unwrap();

    assert_eq!(response.text(), "tiny: hi");
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_inference_is_serialized() {
    let loader = Arc::new(CountingLoader::new(0));
    let max_active = Arc::clone(&loader.max_active);
    let generator = Arc::new(SharedGenerator::new(loader, "tiny"));

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let generator = Arc::clone(&generator);
            tokio::spawn(async move { generator.generate(&request(&i.to_string())).await })
        })
        .collect();
    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_eq!(max_active.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_set_model_forces_reload() {
    let loader = Arc::new(CountingLoader::new(0));
    let loads = Arc::clone(&loader.loads);
    let models = Arc::clone(&loader.models);
    let generator = SharedGenerator::new(loader, "tiny");

    generator.init().await.unwrap();
    generator.set_model("large").await;

    assert!(!generator.is_ready().await);
    assert_eq!(generator.current_model().await, "large");
    assert_eq!(generator.model_name(), "large");

    let response = generator.generate(&request("hi")).await.unwrap();
    assert_eq!(response.text(), "large: hi");
    assert_eq!(loads.load(Ordering::SeqCst), 2);
    assert_eq!(*models.lock().unwrap(), vec!["tiny".to_string(), "large".to_string()]);
}

#[tokio::test]
async fn test_failed_load_is_retried_on_next_use() {
    let loader = Arc::new(CountingLoader::new(1));
    let loads = Arc::clone(&loader.loads);
    let generator = SharedGenerator::new(loader, "tiny");
    let progress = generator.subscribe_progress();

    assert!(generator.init().await.is_err());
    assert!(matches!(progress.borrow().status, LoadStatus::Failed(_)));
    assert!(!generator.is_ready().await);

    generator.init().await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 2);
    assert_eq!(progress.borrow().status, LoadStatus::Ready);
}

#[tokio::test]
async fn test_progress_reports_download_then_ready() {
    let loader = Arc::new(CountingLoader::new(0));
    let generator = Arc::new(SharedGenerator::new(loader, "tiny"));
    let mut progress = generator.subscribe_progress();

    assert_eq!(progress.borrow().status, LoadStatus::Idle);

    let init = {
        let generator = Arc::clone(&generator);
        tokio::spawn(async move { generator.init().await })
    };

    let mut seen = Vec::new();
    while progress.changed().await.is_ok() {
        let status = progress.borrow_and_update().status.clone();
        let done = status == LoadStatus::Ready;
        seen.push(status);
        if done {
            break;
        }
    }
    init.await.unwrap().unwrap();

    assert!(seen.iter().any(|s| matches!(s, LoadStatus::Downloading { .. })));
    assert_eq!(seen.last(), Some(&LoadStatus::Ready));
}

#[tokio::test]
async fn test_dispose_unloads() {
    let loader = Arc::new(CountingLoader::new(0));
    let generator = SharedGenerator::new(loader, "tiny");

    generator.init().await.unwrap();
    generator.dispose().await;

    assert!(!generator.is_ready().await);
    assert_eq!(generator.current_model().await, "tiny");
}
