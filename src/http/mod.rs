//! HTTP boundary subsystem.
//!
//! # Data Flow
//! ```text
//! axum Router (after routing)
//!     → observer.rs (BoundaryService: enter event, start clock)
//!         → request.rs (method, url, body, path params, query)
//!     → inner route service (handlers.rs)
//!     → observer.rs (exit event with status and elapsed ms)
//! ```
//!
//! `registration.rs` installs the observer on every route of a router;
//! `server.rs` wires the demo catalog API together.

pub mod handlers;
pub mod observer;
pub mod registration;
pub mod request;
pub mod server;

pub use observer::{BoundaryLayer, BoundaryService, Observed};
pub use registration::{RouterTraceExt, TraceModule, TraceRegistration};
pub use request::RequestMeta;
pub use server::HttpServer;
