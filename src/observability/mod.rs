//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! trace::TracingSink and every subsystem
//!     → tracing macros (structured fields)
//!     → logging.rs subscriber (EnvFilter + fmt, pretty or JSON)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured filter
//! - Initialization is idempotent so tests and embedders can call it freely

pub mod logging;
