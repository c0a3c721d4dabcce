//! Global registration of the boundary observer.
//!
//! [`TraceModule::for_root`] produces a [`TraceRegistration`] descriptor;
//! installing it on a router applies the observer to every route. The
//! descriptor also hands out the matching [`Tracer`] so method-level
//! tracing shares the same sink and on/off switch.

use std::sync::Arc;

use axum::Router;

use crate::config::TraceConfig;
use crate::http::observer::BoundaryLayer;
use crate::trace::{TraceSink, Tracer};

/// Entry point for configuring request tracing.
#[derive(Debug, Clone, Copy)]
pub struct TraceModule;

impl TraceModule {
    /// Build the registration for `config`, logging into `sink`.
    pub fn for_root(config: &TraceConfig, sink: Arc<dyn TraceSink>) -> TraceRegistration {
        TraceRegistration {
            layer: BoundaryLayer::new(config, sink),
        }
    }
}

/// Descriptor telling a router how to install the observer.
#[derive(Debug, Clone)]
pub struct TraceRegistration {
    layer: BoundaryLayer,
}

impl TraceRegistration {
    pub fn is_enabled(&self) -> bool {
        self.layer.tracer().is_enabled()
    }

    /// Tracer sharing this registration's sink and switch.
    pub fn tracer(&self) -> Tracer {
        self.layer.tracer().clone()
    }

    pub fn layer(&self) -> BoundaryLayer {
        self.layer.clone()
    }

    /// Apply the observer to every route currently in `router`.
    ///
    /// Installing more than once does not duplicate events.
    pub fn install<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(self.layer())
    }
}

/// `Router` extension for installing request tracing fluently.
pub trait RouterTraceExt {
    fn with_request_tracing(self, registration: &TraceRegistration) -> Self;
}

impl<S> RouterTraceExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_request_tracing(self, registration: &TraceRegistration) -> Self {
        registration.install(self)
    }
}
