//! Tests for the telemetry bootstrap.

use marginalia_core::{init_telemetry, shutdown_telemetry};
use opentelemetry::global;
use opentelemetry::trace::{Span, Tracer};

#[test]
fn test_provider_installed_until_shutdown() {
    init_telemetry().unwrap();
    assert!(init_telemetry().is_err());

    let mut span = global::tracer("telemetry-test").start("installed");
    assert!(span.is_recording());
    span.end();

    tracing::info_span!("bridged").in_scope(|| tracing::info!("inside span"));

    shutdown_telemetry();

    let span = global::tracer("telemetry-test").start("after-shutdown");
    assert!(!span.is_recording());
}
