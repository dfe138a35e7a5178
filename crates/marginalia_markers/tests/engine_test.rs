//! Tests for the resolution loop with injected handlers.

use async_trait::async_trait;
use marginalia_error::{MarginaliaResult, MarkerError, MarkerErrorKind};
use marginalia_markers::{
    Engine, EngineConfig, MarkerCall, MarkerHandler, MarkerKind, SubstitutionValue, Termination,
};
use std::sync::{Arc, Mutex};

/// Records every call and renders it as `<kind|param|param>`.
#[derive(Default)]
struct RecordingHandler {
    calls: Arc<Mutex<Vec<MarkerCall>>>,
}

#[async_trait]
impl MarkerHandler for RecordingHandler {
    async fn handle(&self, call: &MarkerCall) -> MarginaliaResult<String> {
        self.calls.lock().unwrap().push(call.clone());
        Ok(match call.kind() {
            MarkerKind::Complete => call.raw_params().clone(),
            kind => format!("<{}|{}>", kind, call.params().join("|")),
        })
    }
}

/// Re-emits a fresh marker every time it is called.
struct EchoHandler;

#[async_trait]
impl MarkerHandler for EchoHandler {
    async fn handle(&self, _call: &MarkerCall) -> MarginaliaResult<String> {
        Ok("{{ai_fact:y}}!".to_string())
    }
}

/// Returns its own marker unchanged.
struct SelfEchoHandler;

#[async_trait]
impl MarkerHandler for SelfEchoHandler {
    async fn handle(&self, call: &MarkerCall) -> MarginaliaResult<String> {
        Ok(format!("{{{{{}:{}}}}}", call.kind(), call.raw_params()))
    }
}

/// Fails for one topic, succeeds otherwise.
struct FailingHandler;

#[async_trait]
impl MarkerHandler for FailingHandler {
    async fn handle(&self, call: &MarkerCall) -> MarginaliaResult<String> {
        if call.param(0) == Some("Broken") {
            return Err(MarkerError::new(MarkerErrorKind::Handler {
                marker: call.kind().to_string(),
                message: "boom".to_string(),
            })
            .into());
        }
        Ok(format!("ok:{}", call.params().join(",")))
    }
}

fn recording_engine() -> (Engine<RecordingHandler>, Arc<Mutex<Vec<MarkerCall>>>) {
    let handler = RecordingHandler::default();
    let calls = Arc::clone(&handler.calls);
    (Engine::new(handler, EngineConfig::default()), calls)
}

#[tokio::test]
async fn test_document_without_markers_is_unchanged() {
    let (engine, calls) = recording_engine();

    for doc in ["", "plain text", "{single} braces and {{name}}", "}} {{ stray"] {
        let report = engine.resolve_with_report(doc, &[]).await;
        assert_eq!(report.document(), doc);
        assert_eq!(*report.termination(), Termination::Fixpoint);
        assert_eq!(*report.iterations(), 0);
    }
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_substitutions_match_omitting_them() {
    let (engine, _) = recording_engine();
    let doc = "Hello {{ai_link:Rust}}";

    let with_empty = engine.resolve(doc, &[]).await;
    let subs: Vec<(&str, SubstitutionValue)> = Vec::new();
    let with_vec = engine.resolve(doc, &subs).await;

    assert_eq!(with_empty, with_vec);
}

#[tokio::test]
async fn test_unknown_marker_is_preserved() {
    let (engine, calls) = recording_engine();

    let report = engine
        .resolve_with_report("Keep {{ai_bogus:x}} and {{ai_nothing}}", &[])
        .await;

    assert_eq!(report.document(), "Keep {{ai_bogus:x}} and {{ai_nothing}}");
    assert_eq!(*report.termination(), Termination::Stalled);
    assert_eq!(
        report.unresolved(),
        &vec!["{{ai_bogus:x}}".to_string(), "{{ai_nothing}}".to_string()]
    );
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_innermost_marker_resolves_first() {
    let (engine, calls) = recording_engine();

    let report = engine
        .resolve_with_report("{{ai_complete:A {{ai_link:Topic}} B}}", &[])
        .await;

    assert_eq!(report.document(), "A <ai_link|Topic> B");
    assert_eq!(*report.iterations(), 2);
    assert_eq!(*report.termination(), Termination::Fixpoint);

    let calls = calls.lock().unwrap();
    assert_eq!(*calls[0].kind(), MarkerKind::Link);
    assert_eq!(*calls[1].kind(), MarkerKind::Complete);
    assert_eq!(calls[1].raw_params(), "A <ai_link|Topic> B");
}

#[tokio::test]
async fn test_parameters_split_per_marker() {
    let (engine, calls) = recording_engine();

    engine
        .resolve("{{ai_answer:Topic:This has: colons}} {{ai_fact:a:b:c}}", &[])
        .await;

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].params(), &vec!["Topic", "This has: colons"]);
    assert_eq!(calls[1].params(), &vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_bare_marker_gets_no_params() {
    let (engine, calls) = recording_engine();

    let out = engine.resolve("{{ai_updated}}", &[]).await;

    assert_eq!(out, "<ai_updated|>");
    assert!(calls.lock().unwrap()[0].params().is_empty());
}

#[tokio::test]
async fn test_identical_markers_share_one_call() {
    let (engine, calls) = recording_engine();

    let out = engine
        .resolve("{{ai_link:A}}, {{ai_link:B}}, {{ai_link:A}}", &[])
        .await;

    assert_eq!(out, "<ai_link|A>, <ai_link|B>, <ai_link|A>");
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_substitutions_run_before_markers() {
    let (engine, _) = recording_engine();

    let out = engine
        .resolve(
            "{{who}} is {{age}}: {{ai_fact:{{topic}}}}",
            &[
                ("who", "Ada".into()),
                ("age", 36.into()),
                ("topic", "Analytical Engine".into()),
            ],
        )
        .await;

    assert_eq!(out, "Ada is 36: <ai_fact|Analytical Engine>");
}

#[tokio::test]
async fn test_substituted_values_are_not_rescanned_as_names() {
    let (engine, _) = recording_engine();

    let out = engine
        .resolve("{{a}} {{b}}", &[("a", "{{b}}".into())])
        .await;

    assert_eq!(out, "{{b}} {{b}}");
}

#[tokio::test]
async fn test_failed_marker_is_preserved_and_others_resolve() {
    let engine = Engine::new(FailingHandler, EngineConfig::default());

    let report = engine
        .resolve_with_report("{{ai_fact:Broken}} then {{ai_fact:Fine}}", &[])
        .await;

    assert_eq!(report.document(), "{{ai_fact:Broken}} then ok:Fine");
    assert_eq!(*report.termination(), Termination::Stalled);
    assert_eq!(report.unresolved(), &vec!["{{ai_fact:Broken}}".to_string()]);
}

#[tokio::test]
async fn test_regenerating_marker_stops_at_cap() {
    let engine = Engine::new(EchoHandler, EngineConfig::default());

    let report = engine.resolve_with_report("{{ai_fact:y}}", &[]).await;

    assert_eq!(*report.termination(), Termination::Capped);
    assert_eq!(*report.iterations(), 10);
    assert_eq!(report.document(), &format!("{{{{ai_fact:y}}}}{}", "!".repeat(10)));
    assert_eq!(report.unresolved(), &vec!["{{ai_fact:y}}".to_string()]);
}

#[tokio::test]
async fn test_self_echo_stalls_with_capped_output() {
    let engine = Engine::new(SelfEchoHandler, EngineConfig::default());

    let report = engine.resolve_with_report("a {{ai_fact:y}} b", &[]).await;

    assert_eq!(*report.termination(), Termination::Stalled);
    assert_eq!(*report.iterations(), 1);
    assert_eq!(report.document(), "a {{ai_fact:y}} b");
    assert_eq!(report.unresolved(), &vec!["{{ai_fact:y}}".to_string()]);
}

#[tokio::test]
async fn test_configurable_cap() {
    let engine = Engine::new(
        EchoHandler,
        EngineConfig::default().with_max_iterations(3),
    );

    let out = engine.resolve("{{ai_fact:y}}", &[]).await;

    assert_eq!(out, "{{ai_fact:y}}!!!");
}

#[tokio::test]
async fn test_resolving_twice_is_noop() {
    let (engine, _) = recording_engine();

    let once = engine
        .resolve("x {{ai_complete:{{ai_summary:S}} tail}} y", &[])
        .await;
    let twice = engine.resolve(&once, &[]).await;

    assert_eq!(once, "x <ai_summary|S> tail y");
    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_resolve_one_marker_reconstructs_original() {
    let engine = Engine::new(FailingHandler, EngineConfig::default());

    assert_eq!(
        engine.resolve_one_marker("ai_fact", Some("Broken")).await,
        "{{ai_fact:Broken}}"
    );
    assert_eq!(
        engine.resolve_one_marker("ai_unknown", None).await,
        "{{ai_unknown}}"
    );
    assert_eq!(
        engine.resolve_one_marker("ai_link", Some(" a : b ")).await,
        "ok:a,b"
    );
}
