// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Query,
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use link_preview_server::{app::build_router, config::FetchConfig, fetcher::HtmlFetcher, state::AppState};

pub const TEST_TIMEOUT: Duration = Duration::from_millis(500);
pub const TEST_MAX_CONTENT_LENGTH: usize = 64 * 1024;
pub const VIDEO_ID: &str = "dQw4w9WgXcQ";

// ── Upstream fixture server ──────────────────────────────────────────────────

const OG_PAGE: &str = r#"<!doctype html>
<html><head>
  <title>Plain Title</title>
  <meta property="og:title" content="  Foo  "/>
  <meta property="og:description" content="An example page"/>
  <meta property="og:image" content="/img/x.png"/>
  <meta property="og:site_name" content="Example Site"/>
</head><body><h1>Heading</h1></body></html>"#;

const TITLE_ONLY_PAGE: &str = r#"<html><head><title> Only Title </title></head><body></body></html>"#;

const VIDEO_PAGE: &str = r#"<html><head>
  <meta property="og:title" content="Page title"/>
  <meta property="og:site_name" content="Page site"/>
</head></html>"#;

async fn echo_headers(headers: HeaderMap) -> Html<String> {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    Html(format!(
        r#"<html><head>
          <meta property="og:title" content="{}"/>
          <meta name="description" content="{}"/>
          <meta name="application-name" content="{}"/>
        </head></html>"#,
        header_value(header::USER_AGENT),
        header_value(header::ACCEPT_LANGUAGE),
        header_value(header::ACCEPT),
    ))
}

async fn oembed(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let expected = format!("https://www.youtube.com/watch?v={VIDEO_ID}");
    if params.get("format").map(String::as_str) != Some("json")
        || params.get("url") != Some(&expected)
    {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad query" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "title": "Never Gonna Give You Up",
            "author_name": "Rick Astley",
            "provider_name": "YouTube",
        })),
    )
}

fn upstream_router() -> Router {
    Router::new()
        .route("/og", get(|| async { Html(OG_PAGE) }))
        .route("/title-only", get(|| async { Html(TITLE_ONLY_PAGE) }))
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Html(OG_PAGE)
            }),
        )
        .route(
            "/huge",
            get(|| async { Html("x".repeat(TEST_MAX_CONTENT_LENGTH + 1)) }),
        )
        .route("/headers", get(echo_headers))
        .route("/youtube.com/watch", get(|| async { Html(VIDEO_PAGE) }))
        .route("/oembed", get(oembed))
        .route(
            "/oembed-huge",
            get(|| async {
                Json(json!({
                    "title": "Oversized",
                    "author_name": "x".repeat(TEST_MAX_CONTENT_LENGTH),
                }))
            }),
        )
        .route(
            "/oembed-broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
}

/// Start the fixture site on an ephemeral local port.
pub async fn spawn_upstream() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream_router()).await.unwrap();
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

// ── App construction ─────────────────────────────────────────────────────────

pub fn test_state(oembed_endpoint: &str) -> AppState {
    let fetch = FetchConfig {
        timeout: TEST_TIMEOUT,
        max_content_length: TEST_MAX_CONTENT_LENGTH,
        ..FetchConfig::default()
    };
    AppState {
        fetcher: HtmlFetcher::new(&fetch).expect("Failed to build test HTTP client"),
        oembed_endpoint: Arc::from(oembed_endpoint),
    }
}

/// Build the application router with an oEmbed endpoint on `upstream`.
pub fn create_test_app(upstream: SocketAddr) -> Router {
    build_router(test_state(&format!("http://{upstream}/oembed")))
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, &body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    send(app, req).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// POST `/api/preview` for `url`.
pub async fn preview(app: Router, url: &str) -> (StatusCode, Value) {
    post_json(app, "/api/preview", json!({ "url": url })).await
}
