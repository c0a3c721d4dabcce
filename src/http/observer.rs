//! Boundary observer: request/response tracing as a tower middleware.
//!
//! # Responsibilities
//! - Log an enter event with method, URL, body, params and query
//! - Call the rest of the pipeline exactly once
//! - Log an exit event with status code and elapsed milliseconds
//!
//! # Design Decisions
//! - Start time lives in the per-request future; no shared timing state
//! - Uses `tokio::time::Instant` so paused test clocks apply
//! - Requests already seen by an observer are tagged with [`Observed`] and
//!   pass through nested observers untouched

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{Request, Response},
};
use futures_util::future::BoxFuture;
use tokio::time::Instant;
use tower::{Layer, Service};

use crate::config::TraceConfig;
use crate::http::request::RequestMeta;
use crate::trace::{TraceEvent, TraceSink, Tracer};

/// Request extension marking a request as already observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observed;

/// Layer that wraps services in a [`BoundaryService`].
#[derive(Debug, Clone)]
pub struct BoundaryLayer {
    tracer: Tracer,
    max_body_bytes: usize,
}

impl BoundaryLayer {
    pub fn new(config: &TraceConfig, sink: Arc<dyn TraceSink>) -> Self {
        Self::from_tracer(Tracer::new(config, sink), config.max_body_bytes)
    }

    /// Share an existing tracer (and its sink and flag).
    pub fn from_tracer(tracer: Tracer, max_body_bytes: usize) -> Self {
        Self {
            tracer,
            max_body_bytes,
        }
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }
}

impl<S> Layer<S> for BoundaryLayer {
    type Service = BoundaryService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BoundaryService {
            inner,
            tracer: self.tracer.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// Middleware logging each request's start and completion.
#[derive(Debug, Clone)]
pub struct BoundaryService<S> {
    inner: S,
    tracer: Tracer,
    max_body_bytes: usize,
}

impl<S, ResBody> Service<Request<Body>> for BoundaryService<S>
where
    S: Service<Request<Body>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        if !self.tracer.is_enabled() || req.extensions().get::<Observed>().is_some() {
            return Box::pin(self.inner.call(req));
        }
        req.extensions_mut().insert(Observed);

        // Keep the instance that was driven to readiness for this request.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let tracer = self.tracer.clone();
        let max_body_bytes = self.max_body_bytes;

        Box::pin(async move {
            let (meta, req) = RequestMeta::capture(req, tracer.renderer(), max_body_bytes).await;
            let start = Instant::now();

            tracer.emit(TraceEvent::request(
                meta.method.as_str(),
                meta.url.as_str(),
                meta.body,
                meta.params,
                meta.query,
            ));

            let result = inner.call(req).await;

            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            let status = result.as_ref().ok().map(|res| res.status().as_u16());
            tracer.emit(TraceEvent::response(meta.method, meta.url, status, elapsed_ms));

            result
        })
    }
}
