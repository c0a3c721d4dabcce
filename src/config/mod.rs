//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → METHOD_TRACING_ENABLED env override
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → TraceConfig handed to the tracers by value
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the tracing flag is read-only for the
//!   process lifetime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, TRACING_ENABLED_ENV};
pub use schema::{
    AppConfig, CatalogConfig, ListenerConfig, LogFormat, LoggingConfig, SerializeFailure, TimeoutConfig,
    TraceConfig,
};
