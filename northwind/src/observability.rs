use opentelemetry::trace::{TraceContextExt, TraceId, TracerProvider};
use rand::Rng;
use rand::rng;
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tracing_subscriber::registry::LookupSpan;

/// Installs the W3C propagator and returns a layer that attaches an otel
/// context to every span. No exporter is registered; the provider only
/// exists so spans get trace ids that can be propagated.
pub(crate) fn telemetry_layer<S>()
-> tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    opentelemetry::global::set_text_map_propagator(
        opentelemetry_sdk::propagation::TraceContextPropagator::new(),
    );

    let provider = opentelemetry_sdk::trace::TracerProvider::builder().build();
    opentelemetry::global::set_tracer_provider(provider.clone());

    tracing_opentelemetry::layer().with_tracer(provider.tracer("northwind"))
}

pub fn get_current_trace_id() -> Option<TraceId> {
    let span = tracing::Span::current();
    let context = span.context();
    let span_context = context.span().span_context().clone();

    if span_context.is_valid() {
        Some(span_context.trace_id())
    } else {
        None
    }
}

pub fn generate_trace_id() -> TraceId {
    let mut rng = rng();
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    TraceId::from_bytes(bytes)
}

pub fn get_trace_id_string() -> String {
    get_current_trace_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| generate_trace_id().to_string())
}
