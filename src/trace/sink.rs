//! Log sinks for trace events.

use std::sync::{Arc, Mutex};

use crate::trace::event::{Direction, Severity, TraceEvent};

/// Destination for trace events.
///
/// Sinks are best-effort: tracers never inspect whether recording worked.
pub trait TraceSink: Send + Sync {
    fn record(&self, event: &TraceEvent);
}

impl<T: TraceSink + ?Sized> TraceSink for Arc<T> {
    fn record(&self, event: &TraceEvent) {
        (**self).record(event)
    }
}

/// Forwards events to the `tracing` macros with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, event: &TraceEvent) {
        let message = event.message();
        let logger = event.category();
        let direction = direction_name(event.direction);

        match event.severity() {
            Severity::Debug => tracing::debug!(
                logger,
                direction,
                subject = %event.subject,
                "{}",
                message
            ),
            Severity::Info => tracing::info!(
                logger,
                direction,
                subject = %event.subject,
                elapsed_ms = event.elapsed_ms(),
                "{}",
                message
            ),
            Severity::Error => tracing::error!(
                logger,
                direction,
                subject = %event.subject,
                detail = event.detail(),
                "{}",
                message
            ),
        }
    }
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Enter => "enter",
        Direction::Exit => "exit",
        Direction::Error => "error",
    }
}

/// Keeps every event in memory, in emission order.
///
/// Cloning shares the underlying buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<TraceEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Directions of the recorded events, in order.
    pub fn directions(&self) -> Vec<Direction> {
        self.events().iter().map(|e| e.direction).collect()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl TraceSink for MemorySink {
    fn record(&self, event: &TraceEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemorySink::new();
        let shared: Arc<dyn TraceSink> = Arc::new(sink.clone());

        shared.record(&TraceEvent::enter("f", "[]".into()));
        shared.record(&TraceEvent::exit("f", "1".into()));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.directions(), vec![Direction::Enter, Direction::Exit]);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_tracing_sink_accepts_every_severity() {
        let sink = TracingSink;
        sink.record(&TraceEvent::enter("f", "[]".into()));
        sink.record(&TraceEvent::response("GET", "/", Some(200), 1));
        sink.record(&TraceEvent::error("f", "boom".into(), None));
    }
}
