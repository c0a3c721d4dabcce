//! Boundary observer behavior through a routed axum app.

use request_trace::trace::{Direction, Payload};
use tower::ServiceExt;

mod common;

#[tokio::test(start_paused = true)]
async fn test_exit_reports_handler_delay() {
    let (app, sink) = common::observed_app(&common::trace_config(true));

    let res = app.oneshot(common::get_request("/sleep/250")).await.unwrap();
    assert_eq!(res.status(), 200);

    let events = sink.events();
    assert_eq!(sink.directions(), vec![Direction::Enter, Direction::Exit]);

    let (status, elapsed) = common::exit_for(&events, "GET /sleep/250");
    assert_eq!(status, Some(200));
    assert!((250..=251).contains(&elapsed), "elapsed {elapsed}ms");
}

#[tokio::test(start_paused = true)]
async fn test_failure_status_gets_single_exit() {
    let (app, sink) = common::observed_app(&common::trace_config(true));

    let res = app.oneshot(common::get_request("/fail/30")).await.unwrap();
    assert_eq!(res.status(), 500);

    let events = sink.events();
    assert_eq!(sink.directions(), vec![Direction::Enter, Direction::Exit]);
    assert_eq!(events[1].message(), format!("◀ GET /fail/30 500 - {}ms", events[1].elapsed_ms().unwrap()));
    assert_eq!(common::exit_for(&events, "GET /fail/30").0, Some(500));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_are_isolated() {
    let (app, sink) = common::observed_app(&common::trace_config(true));

    let slow = app.clone().oneshot(common::get_request("/sleep/300"));
    let fast = app.clone().oneshot(common::get_request("/sleep/40"));
    let failing = app.oneshot(common::get_request("/fail/120"));
    let (slow, fast, failing) = tokio::join!(slow, fast, failing);
    assert_eq!(slow.unwrap().status(), 200);
    assert_eq!(fast.unwrap().status(), 200);
    assert_eq!(failing.unwrap().status(), 500);

    let events = sink.events();
    assert_eq!(events.len(), 6);

    // All three start before any finishes; exits follow completion order.
    let directions: Vec<_> = events.iter().map(|e| e.direction).collect();
    assert_eq!(&directions[..3], &[Direction::Enter; 3]);
    let exits: Vec<_> = events[3..].iter().map(|e| e.subject.as_str()).collect();
    assert_eq!(exits, vec!["GET /sleep/40", "GET /fail/120", "GET /sleep/300"]);

    for (subject, expected) in [
        ("GET /sleep/40", 40),
        ("GET /fail/120", 120),
        ("GET /sleep/300", 300),
    ] {
        let (_, elapsed) = common::exit_for(&events, subject);
        assert!(
            (expected..=expected + 1).contains(&elapsed),
            "{subject}: elapsed {elapsed}ms"
        );
    }
}

#[tokio::test]
async fn test_request_metadata_and_body_pass_through() {
    let (app, sink) = common::observed_app(&common::trace_config(true));

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/echo/7?dry_run=1")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(r#"{"qty":3}"#))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), 200);

    let bytes = http_body_util::BodyExt::collect(res.into_body())
        .await
        .unwrap()
        .to_bytes();
    let echoed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(echoed, serde_json::json!({ "id": 7, "body": { "qty": 3 } }));

    match &sink.events()[0].payload {
        Payload::Request {
            method,
            url,
            body,
            params,
            query,
        } => {
            assert_eq!(method, "POST");
            assert_eq!(url, "/echo/7?dry_run=1");
            assert_eq!(body, r#"{"qty":3}"#);
            assert_eq!(params, r#"{"id":"7"}"#);
            assert_eq!(query, r#"{"dry_run":"1"}"#);
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[tokio::test]
async fn test_disabled_flag_emits_nothing() {
    let (app, sink) = common::observed_app(&common::trace_config(false));

    let res = app.clone().oneshot(common::get_request("/sleep/1")).await.unwrap();
    assert_eq!(res.status(), 200);
    let res = app.oneshot(common::get_request("/fail/1")).await.unwrap();
    assert_eq!(res.status(), 500);

    assert!(sink.is_empty());
}
