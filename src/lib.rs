//! Request and method tracing for axum services.
//!
//! Two tracers share one on/off switch and one injected sink:
//! - [`trace::Tracer`] wraps individual callables and logs entry, exit and
//!   failure, for synchronous results and futures alike
//! - [`http::BoundaryLayer`] logs each inbound request and its status and
//!   latency, installed globally through [`http::TraceModule`]

pub mod catalog;
pub mod config;
pub mod http;
pub mod observability;
pub mod trace;

pub use config::{AppConfig, TraceConfig};
pub use http::{HttpServer, TraceModule, TraceRegistration};
pub use trace::{Outcome, TraceSink, Traced, Tracer};
