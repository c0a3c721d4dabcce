//! Invocation tracing subsystem.
//!
//! # Data Flow
//! ```text
//! caller → Traced::call(args)
//!     → render.rs (args → JSON) → TraceEvent::enter → sink.rs
//!     → original callable
//!     → outcome.rs: Ready(result)  → exit/error event now
//!                   Deferred(fut)  → exit/error event when fut resolves
//!     → caller receives the original result, error or panic unchanged
//! ```
//!
//! # Design Decisions
//! - Explicit wrapping (`Tracer::wrap`) instead of annotations
//! - Sync vs deferred is decided per call by the `Outcome` discriminant
//! - The sink is injected; there is no global logger
//! - Disabled tracing calls straight through and emits nothing

pub mod event;
pub mod invocation;
pub mod outcome;
pub mod render;
pub mod sink;

pub use event::{Direction, Payload, Severity, TraceEvent};
pub use invocation::{Traced, Tracer, UNKNOWN_NAME};
pub use outcome::{IntoOutcome, Outcome};
pub use render::PayloadRenderer;
pub use sink::{MemorySink, TraceSink, TracingSink};
