//! Request metadata capture.
//!
//! # Responsibilities
//! - Extract method, original URL, path parameters and query string
//! - Buffer small bodies for logging and hand them on unchanged
//!
//! # Design Decisions
//! - Bodies are only buffered when their size hint is within the limit;
//!   everything else streams through untouched
//! - A body that fails to read is forwarded as a body yielding the same
//!   error, so the handler sees the failure it would have seen anyway

use std::collections::BTreeMap;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{FromRequestParts, OriginalUri, Query, RawPathParams},
    http::{request::Parts, Request},
};
use futures_util::stream;

use crate::trace::PayloadRenderer;

const EMPTY_OBJECT: &str = "{}";

/// What the boundary observer logs about an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub method: String,
    /// Path and query as the client sent them.
    pub url: String,
    pub body: String,
    pub params: String,
    pub query: String,
}

impl RequestMeta {
    /// Capture metadata from `req`, returning it with an equivalent request.
    pub async fn capture(
        req: Request<Body>,
        renderer: &PayloadRenderer,
        max_body_bytes: usize,
    ) -> (Self, Request<Body>) {
        let (mut parts, body) = req.into_parts();

        let params = path_params(&mut parts, renderer).await;
        let query = query_params(&parts, renderer);
        let (body_text, body) = capture_body(body, renderer, max_body_bytes).await;

        let meta = Self {
            method: parts.method.to_string(),
            url: original_url(&parts),
            body: body_text,
            params,
            query,
        };
        (meta, Request::from_parts(parts, body))
    }
}

fn original_url(parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

async fn path_params(parts: &mut Parts, renderer: &PayloadRenderer) -> String {
    match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => {
            let map: BTreeMap<&str, &str> = params.iter().collect();
            renderer.render(&map)
        }
        Err(_) => EMPTY_OBJECT.to_string(),
    }
}

fn query_params(parts: &Parts, renderer: &PayloadRenderer) -> String {
    match Query::<BTreeMap<String, String>>::try_from_uri(&parts.uri) {
        Ok(Query(map)) => renderer.render(&map),
        Err(_) => EMPTY_OBJECT.to_string(),
    }
}

async fn capture_body(
    body: Body,
    renderer: &PayloadRenderer,
    max_body_bytes: usize,
) -> (String, Body) {
    let hint = body.size_hint();
    if hint.exact() == Some(0) {
        return (EMPTY_OBJECT.to_string(), body);
    }

    match hint.upper() {
        Some(upper) if upper <= max_body_bytes as u64 => {}
        _ => return ("<streamed>".to_string(), body),
    }

    match axum::body::to_bytes(body, max_body_bytes).await {
        Ok(bytes) => (render_body(&bytes, renderer), Body::from(bytes)),
        Err(err) => {
            let text = format!("<unreadable: {err}>");
            let replay = Body::from_stream(stream::once(async move { Err::<Bytes, _>(err) }));
            (text, replay)
        }
    }
}

fn render_body(bytes: &Bytes, renderer: &PayloadRenderer) -> String {
    if bytes.is_empty() {
        return EMPTY_OBJECT.to_string();
    }
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(json) => renderer.render(&json),
        Err(_) => renderer.truncate(String::from_utf8_lossy(bytes).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_json_body_and_query() {
        let req = Request::builder()
            .method("POST")
            .uri("/items?limit=2&tag=red")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "lamp"}"#))
            .unwrap();

        let (meta, req) = RequestMeta::capture(req, &PayloadRenderer::default(), 1024).await;

        assert_eq!(meta.method, "POST");
        assert_eq!(meta.url, "/items?limit=2&tag=red");
        assert_eq!(meta.body, r#"{"name":"lamp"}"#);
        assert_eq!(meta.query, r#"{"limit":"2","tag":"red"}"#);
        // Not routed, so there are no path parameters.
        assert_eq!(meta.params, "{}");

        let forwarded = axum::body::to_bytes(req.into_body(), 1024).await.unwrap();
        assert_eq!(&forwarded[..], br#"{"name": "lamp"}"#);
    }

    #[tokio::test]
    async fn test_empty_body_renders_as_object() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (meta, _) = RequestMeta::capture(req, &PayloadRenderer::default(), 1024).await;

        assert_eq!(meta.method, "GET");
        assert_eq!(meta.body, "{}");
        assert_eq!(meta.query, "{}");
    }

    #[tokio::test]
    async fn test_plain_text_body() {
        let req = Request::builder()
            .method("PUT")
            .uri("/notes")
            .body(Body::from("hello there"))
            .unwrap();
        let (meta, _) = RequestMeta::capture(req, &PayloadRenderer::default(), 1024).await;

        assert_eq!(meta.body, "hello there");
    }

    #[tokio::test]
    async fn test_oversized_body_streams_through() {
        let payload = "x".repeat(64);
        let req = Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from(payload.clone()))
            .unwrap();

        let (meta, req) = RequestMeta::capture(req, &PayloadRenderer::default(), 16).await;
        assert_eq!(meta.body, "<streamed>");

        let forwarded = axum::body::to_bytes(req.into_body(), 1024).await.unwrap();
        assert_eq!(forwarded, payload.as_bytes());
    }
}
