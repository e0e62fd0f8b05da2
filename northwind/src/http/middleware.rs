mod responsemapperlayer;

pub use responsemapperlayer::response_mapper_layer;

use axum::http::Request;
use axum::response::IntoResponse;
use opentelemetry::trace::TraceContextExt;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACE_ID_HEADER: &str = "X-Trace-ID";

struct HeaderMapExtractor<'a>(&'a axum::http::HeaderMap);

impl<'a> opentelemetry::propagation::Extractor for HeaderMapExtractor<'a> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

fn trace_span<B>(req: &Request<B>) -> (String, tracing::Span) {
    let parent_context =
        opentelemetry::global::get_text_map_propagator(|propagator| {
            propagator.extract(&HeaderMapExtractor(req.headers()))
        });

    let span = tracing::info_span!(
        "http.request",
        method = %req.method(),
        uri = %req.uri(),
        trace_id = tracing::field::Empty,
    );
    // a fresh trace id is generated when no traceparent was sent
    span.set_parent(parent_context);
    let span_context = span.context().span().span_context().clone();
    let trace_id = if span_context.is_valid() {
        span_context.trace_id().to_string()
    } else {
        crate::observability::generate_trace_id().to_string()
    };
    span.record("trace_id", &trace_id);
    (trace_id, span)
}

fn add_trace_id(response: &mut axum::response::Response, trace_id: &str) {
    if let Ok(value) = axum::http::HeaderValue::from_str(trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
}

/// Opens an `http.request` span per request, continuing any W3C
/// `traceparent` the caller sent, and echoes the trace id in `X-Trace-ID`.
#[derive(Clone, Default)]
pub struct TraceLayer;

impl<S> Layer<S> for TraceLayer {
    type Service = TraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceService { inner }
    }
}

#[derive(Clone, Default)]
pub struct TraceService<S> {
    inner: S,
}

impl<B, S> Service<Request<B>> for TraceService<S>
where
    S: Service<Request<B>, Response = axum::response::Response>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    S::Error: IntoResponse,
    B: Send + 'static,
{
    type Response = axum::response::Response;
    type Error = S::Error;
    type Future = Pin<
        Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let (trace_id, span) = trace_span(&req);
        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let mut response = inner.call(req).await?;
                tracing::debug!(status = %response.status(), "request done");
                add_trace_id(&mut response, &trace_id);
                Ok(response)
            }
            .instrument(span),
        )
    }
}
