//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use request_trace::config::TraceConfig;
use request_trace::trace::{MemorySink, Payload, TraceEvent};
use request_trace::{HttpServer, TraceModule};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Trace config with tracing switched on or off.
#[allow(dead_code)]
pub fn trace_config(enabled: bool) -> TraceConfig {
    TraceConfig {
        enabled,
        ..TraceConfig::default()
    }
}

/// Router with delayed and failing routes, observed into a fresh sink.
#[allow(dead_code)]
pub fn observed_app(config: &TraceConfig) -> (Router, MemorySink) {
    let sink = MemorySink::new();
    let registration = TraceModule::for_root(config, Arc::new(sink.clone()));

    let app = Router::new()
        .route(
            "/sleep/{ms}",
            get(|Path(ms): Path<u64>| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                format!("slept {ms}ms")
            }),
        )
        .route(
            "/fail/{ms}",
            get(|Path(ms): Path<u64>| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                (StatusCode::INTERNAL_SERVER_ERROR, "broken")
            }),
        )
        .route(
            "/echo/{id}",
            post(|Path(id): Path<u32>, Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!({ "id": id, "body": body }))
            }),
        );

    (registration.install(app), sink)
}

#[allow(dead_code)]
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// The exit event for `subject`.
#[allow(dead_code)]
pub fn exit_for(events: &[TraceEvent], subject: &str) -> (Option<u16>, u64) {
    events
        .iter()
        .find_map(|event| match &event.payload {
            Payload::Response {
                status, elapsed_ms, ..
            } if event.subject == subject => Some((*status, *elapsed_ms)),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no exit event for {subject}"))
}

/// Start the demo server on an ephemeral port.
///
/// Dropping the returned sender shuts the server down.
#[allow(dead_code)]
pub async fn start_server(server: HttpServer) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let _ = server
            .run_until(listener, async move {
                let _ = rx.await;
            })
            .await;
    });

    (addr, tx)
}
