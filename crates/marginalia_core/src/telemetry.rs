//! Tracing subscriber bootstrap.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
};
use opentelemetry_stdout::SpanExporter;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a fmt subscriber plus an OpenTelemetry stdout span exporter.
///
/// The tracer provider is also installed globally so that
/// [`shutdown_telemetry`] can flush it. Respects `RUST_LOG`.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let provider = TracerProvider::builder()
        .with_simple_exporter(SpanExporter::default())
        .with_id_generator(RandomIdGenerator::default())
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(Resource::default())
        .build();

    let tracer = provider.tracer("marginalia");

    let telemetry_layer = tracing_opentelemetry::layer()
        .with_tracer(tracer)
        .with_filter(EnvFilter::from_default_env());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(fmt_layer)
        .try_init()?;

    opentelemetry::global::set_tracer_provider(provider);
    Ok(())
}

/// Install only the human-readable fmt layer.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(EnvFilter::from_default_env()),
        )
        .try_init()?;
    Ok(())
}

/// Flush pending spans and uninstall the global tracer provider.
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}
