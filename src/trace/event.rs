//! Trace events.
//!
//! Events are never stored by the tracers; they are handed to a
//! [`TraceSink`](crate::trace::TraceSink) and dropped.

use std::fmt;

/// Which side of an invocation or request an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Enter,
    Exit,
    Error,
}

/// Log level a sink should use for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Error,
}

/// What an event carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Rendered argument list of a traced call.
    Args(String),
    /// Rendered return value of a traced call.
    Result(String),
    /// A traced call failed; `detail` carries the error chain or panic
    /// location when available.
    Failure {
        message: String,
        detail: Option<String>,
    },
    /// An inbound request is starting.
    Request {
        method: String,
        url: String,
        body: String,
        params: String,
        query: String,
    },
    /// An inbound request has completed. `status` is `None` when the
    /// inner service failed without producing a response.
    Response {
        method: String,
        url: String,
        status: Option<u16>,
        elapsed_ms: u64,
    },
}

/// A single observation emitted by a tracer.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    pub direction: Direction,
    pub subject: String,
    pub payload: Payload,
}

impl TraceEvent {
    pub fn enter(subject: impl Into<String>, args: String) -> Self {
        Self {
            direction: Direction::Enter,
            subject: subject.into(),
            payload: Payload::Args(args),
        }
    }

    pub fn exit(subject: impl Into<String>, result: String) -> Self {
        Self {
            direction: Direction::Exit,
            subject: subject.into(),
            payload: Payload::Result(result),
        }
    }

    pub fn error(subject: impl Into<String>, message: String, detail: Option<String>) -> Self {
        Self {
            direction: Direction::Error,
            subject: subject.into(),
            payload: Payload::Failure { message, detail },
        }
    }

    pub fn request(
        method: impl Into<String>,
        url: impl Into<String>,
        body: String,
        params: String,
        query: String,
    ) -> Self {
        let (method, url) = (method.into(), url.into());
        Self {
            direction: Direction::Enter,
            subject: format!("{method} {url}"),
            payload: Payload::Request {
                method,
                url,
                body,
                params,
                query,
            },
        }
    }

    pub fn response(
        method: impl Into<String>,
        url: impl Into<String>,
        status: Option<u16>,
        elapsed_ms: u64,
    ) -> Self {
        let (method, url) = (method.into(), url.into());
        Self {
            direction: Direction::Exit,
            subject: format!("{method} {url}"),
            payload: Payload::Response {
                method,
                url,
                status,
                elapsed_ms,
            },
        }
    }

    /// Method-level events log at debug, request-level at info, and any
    /// failure at error.
    pub fn severity(&self) -> Severity {
        match self.payload {
            Payload::Failure { .. } => Severity::Error,
            Payload::Request { .. } | Payload::Response { .. } => Severity::Info,
            Payload::Args(_) | Payload::Result(_) => Severity::Debug,
        }
    }

    /// Name of the logical logger the event belongs to.
    pub fn category(&self) -> &'static str {
        match self.payload {
            Payload::Request { .. } | Payload::Response { .. } => "HTTP",
            _ => "Trace",
        }
    }

    /// Human-readable log line.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Secondary detail (error chain, panic location).
    pub fn detail(&self) -> Option<&str> {
        match &self.payload {
            Payload::Failure { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Elapsed time of a completed request.
    pub fn elapsed_ms(&self) -> Option<u64> {
        match self.payload {
            Payload::Response { elapsed_ms, .. } => Some(elapsed_ms),
            _ => None,
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Args(args) => write!(f, "▶ Enter {} with args: {}", self.subject, args),
            Payload::Result(result) => {
                write!(f, "◀ Exit {} with result: {}", self.subject, result)
            }
            Payload::Failure { message, .. } => {
                write!(f, "‼ Error in {}: {}", self.subject, message)
            }
            Payload::Request {
                method,
                url,
                body,
                params,
                query,
            } => write!(
                f,
                "▶ {method} {url} - body={body}, params={params}, query={query}"
            ),
            Payload::Response {
                method,
                url,
                status,
                elapsed_ms,
            } => match status {
                Some(status) => write!(f, "◀ {method} {url} {status} - {elapsed_ms}ms"),
                None => write!(f, "◀ {method} {url} failed - {elapsed_ms}ms"),
            },
        }
    }
}
