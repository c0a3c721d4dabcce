//! The invocation tracer.
//!
//! [`Tracer::wrap`] turns any callable taking a serializable argument tuple
//! into a [`Traced`] callable that logs entry, exit and failure without
//! changing what the caller sees:
//!
//! ```
//! use std::sync::Arc;
//! use request_trace::config::TraceConfig;
//! use request_trace::trace::{MemorySink, Tracer};
//!
//! let sink = MemorySink::new();
//! let tracer = Tracer::new(&TraceConfig::default(), Arc::new(sink.clone()));
//!
//! let add = tracer.wrap("add", |(a, b): (i32, i32)| Ok::<_, String>(a + b));
//! assert_eq!(add.call((2, 3)).into_ready(), Some(Ok(5)));
//! assert_eq!(sink.len(), 2);
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures_util::FutureExt;
use serde::Serialize;

use crate::config::TraceConfig;
use crate::trace::event::TraceEvent;
use crate::trace::outcome::{IntoOutcome, Outcome};
use crate::trace::render::PayloadRenderer;
use crate::trace::sink::TraceSink;

/// Name used for callables wrapped without one.
pub const UNKNOWN_NAME: &str = "<unknown>";

/// Handle shared by everything that traces invocations.
///
/// The enabled flag is fixed at construction.
#[derive(Clone)]
pub struct Tracer {
    enabled: bool,
    renderer: PayloadRenderer,
    sink: Arc<dyn TraceSink>,
}

impl Tracer {
    pub fn new(config: &TraceConfig, sink: Arc<dyn TraceSink>) -> Self {
        Self {
            enabled: config.enabled,
            renderer: PayloadRenderer::from_config(config),
            sink,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Wrap `f` under `name`.
    ///
    /// When tracing is disabled the returned value only forwards calls.
    pub fn wrap<F>(&self, name: impl Into<Cow<'static, str>>, f: F) -> Traced<F> {
        Traced {
            name: name.into(),
            inner: f,
            tracer: self.enabled.then(|| self.clone()),
        }
    }

    /// Wrap a callable that has no meaningful name.
    pub fn wrap_unnamed<F>(&self, f: F) -> Traced<F> {
        self.wrap(UNKNOWN_NAME, f)
    }

    /// Wrap and immediately invoke `f`.
    ///
    /// Suited to call sites that borrow their receiver, where building a
    /// long-lived [`Traced`] is not possible.
    pub fn trace<A, R, F>(&self, name: &'static str, args: A, f: F) -> Outcome<R::Ok, R::Err>
    where
        F: FnOnce(A) -> R,
        A: Serialize,
        R: IntoOutcome,
        R::Ok: Serialize + Send + 'static,
        R::Err: fmt::Display + fmt::Debug + Send + 'static,
    {
        if !self.enabled {
            return f(args).into_outcome();
        }
        invoke(self, &Cow::Borrowed(name), args, f)
    }

    /// Like [`Tracer::trace`] for callables that always finish synchronously.
    pub fn trace_sync<A, T, E, F>(&self, name: &'static str, args: A, f: F) -> Result<T, E>
    where
        F: FnOnce(A) -> Result<T, E>,
        A: Serialize,
        T: Serialize,
        E: fmt::Display + fmt::Debug,
    {
        if !self.enabled {
            return f(args);
        }
        let result = enter_and_call(self, name, args, f);
        self.observe(name, &result);
        result
    }

    pub(crate) fn emit(&self, event: TraceEvent) {
        self.sink.record(&event);
    }

    pub(crate) fn renderer(&self) -> &PayloadRenderer {
        &self.renderer
    }

    fn observe<T, E>(&self, name: &str, result: &Result<T, E>)
    where
        T: Serialize,
        E: fmt::Display + fmt::Debug,
    {
        let event = match result {
            Ok(value) => TraceEvent::exit(name, self.renderer.render(value)),
            Err(err) => TraceEvent::error(name, err.to_string(), Some(format!("{err:?}"))),
        };
        self.emit(event);
    }

    fn observe_panic(&self, name: &str, payload: &(dyn Any + Send)) {
        self.emit(TraceEvent::error(
            name,
            panic_message(payload),
            Some("panicked".to_string()),
        ));
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.enabled)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

/// A callable decorated with tracing.
///
/// Holds the original callable unchanged; see [`Tracer::wrap`].
pub struct Traced<F> {
    name: Cow<'static, str>,
    inner: F,
    tracer: Option<Tracer>,
}

impl<F> Traced<F> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_traced(&self) -> bool {
        self.tracer.as_ref().is_some_and(Tracer::is_enabled)
    }

    /// Invoke the original callable with `args`.
    ///
    /// Returns exactly what the callable returned. A panic inside the
    /// callable is logged and then resumed with its original payload.
    pub fn call<A, R>(&self, args: A) -> Outcome<R::Ok, R::Err>
    where
        F: Fn(A) -> R,
        A: Serialize,
        R: IntoOutcome,
        R::Ok: Serialize + Send + 'static,
        R::Err: fmt::Display + fmt::Debug + Send + 'static,
    {
        match &self.tracer {
            Some(tracer) if tracer.is_enabled() => invoke(tracer, &self.name, args, &self.inner),
            _ => (self.inner)(args).into_outcome(),
        }
    }
}

impl<F> fmt::Debug for Traced<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traced")
            .field("name", &self.name)
            .field("traced", &self.is_traced())
            .finish_non_exhaustive()
    }
}

fn invoke<A, R, F>(
    tracer: &Tracer,
    name: &Cow<'static, str>,
    args: A,
    f: F,
) -> Outcome<R::Ok, R::Err>
where
    F: FnOnce(A) -> R,
    A: Serialize,
    R: IntoOutcome,
    R::Ok: Serialize + Send + 'static,
    R::Err: fmt::Display + fmt::Debug + Send + 'static,
{
    match enter_and_call(tracer, name, args, |args| f(args).into_outcome()) {
        Outcome::Ready(result) => {
            tracer.observe(name, &result);
            Outcome::Ready(result)
        }
        Outcome::Deferred(fut) => {
            let tracer = tracer.clone();
            let name = name.clone();
            Outcome::deferred(async move {
                match AssertUnwindSafe(fut).catch_unwind().await {
                    Ok(result) => {
                        tracer.observe(&name, &result);
                        result
                    }
                    Err(payload) => {
                        tracer.observe_panic(&name, &*payload);
                        panic::resume_unwind(payload)
                    }
                }
            })
        }
    }
}

/// Emit the enter event and run `f`, logging and resuming any panic.
fn enter_and_call<A, R, F>(tracer: &Tracer, name: &str, args: A, f: F) -> R
where
    F: FnOnce(A) -> R,
    A: Serialize,
{
    tracer.emit(TraceEvent::enter(name, tracer.renderer.render_args(&args)));

    match panic::catch_unwind(AssertUnwindSafe(|| f(args))) {
        Ok(produced) => produced,
        Err(payload) => {
            tracer.observe_panic(name, &*payload);
            panic::resume_unwind(payload)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
