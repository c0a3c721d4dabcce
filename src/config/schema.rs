//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the tracing demo service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Method and request tracing settings.
    pub tracing: TraceConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Log subscriber settings.
    pub logging: LoggingConfig,

    /// Demo catalog settings.
    pub catalog: CatalogConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Tracing switch and payload rendering limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Global on/off switch for both the invocation tracer and the
    /// boundary observer.
    pub enabled: bool,

    /// What to do when an argument or result cannot be serialized.
    pub on_serialize_error: SerializeFailure,

    /// Rendered payloads longer than this are truncated.
    pub max_payload_bytes: usize,

    /// Request bodies up to this size (by Content-Length) are buffered
    /// and logged; larger or unsized bodies stream through unlogged.
    pub max_body_bytes: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            on_serialize_error: SerializeFailure::Placeholder,
            max_payload_bytes: 4096,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Policy for payloads that fail to serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SerializeFailure {
    /// Log `<unserializable: reason>` and let the call proceed.
    #[default]
    Placeholder,
    /// Panic inside the traced call.
    Panic,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Demo catalog configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Simulated storage latency per catalog read or write, in milliseconds.
    pub latency_ms: u64,
}

/// Log subscriber configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is not set.
    pub filter: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "request_trace=debug,tower_http=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for production.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.tracing.enabled);
        assert_eq!(config.tracing.on_serialize_error, SerializeFailure::Placeholder);
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.catalog.latency_ms, 0);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [tracing]
            enabled = false
            on_serialize_error = "panic"

            [logging]
            format = "json"

            [catalog]
            latency_ms = 15
            "#,
        )
        .unwrap();

        assert!(!config.tracing.enabled);
        assert_eq!(config.tracing.on_serialize_error, SerializeFailure::Panic);
        assert_eq!(config.tracing.max_payload_bytes, 4096);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.catalog.latency_ms, 15);
    }
}
