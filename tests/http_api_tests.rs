// Integration tests driving the full request-routing path in-process,
// including the CORS header matrix the browser relies on.

use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::{Request, Response};

use hello_stack::config::{AppState, Config};
use hello_stack::handler::handle_request;

fn test_state() -> Arc<AppState> {
    let mut cfg = Config::load_from("nonexistent-config").expect("defaults should load");
    // Keep test output quiet
    cfg.logging.access_log = false;
    Arc::new(AppState::new(&cfg))
}

fn peer() -> SocketAddr {
    "127.0.0.1:54321".parse().unwrap()
}

async fn send(state: &Arc<AppState>, req: Request<()>) -> Response<http_body_util::Full<hyper::body::Bytes>> {
    handle_request(req, peer(), Arc::clone(state))
        .await
        .expect("handler is infallible")
}

async fn body_bytes(response: Response<http_body_util::Full<hyper::body::Bytes>>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes()
        .to_vec()
}

#[tokio::test]
async fn message_returns_exact_json() {
    let state = test_state();
    let req = Request::builder()
        .method("GET")
        .uri("/api/message")
        .body(())
        .unwrap();

    let response = send(&state, req).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("Content-Type").unwrap(),
        "application/json"
    );

    let body = body_bytes(response).await;
    assert_eq!(&body[..], br#"{"message":"Hello from Server"}"#);
}

#[tokio::test]
async fn message_ignores_request_headers() {
    let state = test_state();
    let req = Request::builder()
        .method("GET")
        .uri("/api/message")
        .header("X-Custom", "anything")
        .header("Accept", "text/plain")
        .header("Cookie", "session=abc")
        .body(())
        .unwrap();

    let response = send(&state, req).await;
    assert_eq!(response.status(), 200);
    let body = body_bytes(response).await;
    assert_eq!(&body[..], br#"{"message":"Hello from Server"}"#);
}

#[tokio::test]
async fn allowed_origin_gets_cors_headers() {
    let state = test_state();
    let req = Request::builder()
        .method("GET")
        .uri("/api/message")
        .header("Origin", "http://localhost:5173")
        .body(())
        .unwrap();

    let response = send(&state, req).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("Access-Control-Allow-Origin")
            .unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        response
            .headers()
            .get("Access-Control-Allow-Credentials")
            .unwrap(),
        "true"
    );
    assert_eq!(response.headers().get("Vary").unwrap(), "Origin");
}

#[tokio::test]
async fn disallowed_origin_gets_no_allow_origin_header() {
    let state = test_state();
    let req = Request::builder()
        .method("GET")
        .uri("/api/message")
        .header("Origin", "http://evil.example")
        .body(())
        .unwrap();

    let response = send(&state, req).await;
    // The server still answers; the browser does the blocking
    assert_eq!(response.status(), 200);
    assert!(response
        .headers()
        .get("Access-Control-Allow-Origin")
        .is_none());
    assert!(response
        .headers()
        .get("Access-Control-Allow-Credentials")
        .is_none());
    assert_eq!(response.headers().get("Vary").unwrap(), "Origin");

    let body = body_bytes(response).await;
    assert_eq!(&body[..], br#"{"message":"Hello from Server"}"#);
}

#[tokio::test]
async fn preflight_for_allowed_origin() {
    let state = test_state();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/message")
        .header("Origin", "http://localhost:5174")
        .header("Access-Control-Request-Method", "GET")
        .body(())
        .unwrap();

    let response = send(&state, req).await;
    assert_eq!(response.status(), 204);
    assert_eq!(
        response
            .headers()
            .get("Access-Control-Allow-Origin")
            .unwrap(),
        "http://localhost:5174"
    );
    assert_eq!(
        response
            .headers()
            .get("Access-Control-Allow-Methods")
            .unwrap(),
        "GET, HEAD, OPTIONS"
    );
    assert_eq!(
        response.headers().get("Access-Control-Max-Age").unwrap(),
        "86400"
    );
}

#[tokio::test]
async fn preflight_for_disallowed_origin_is_bare() {
    let state = test_state();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/message")
        .header("Origin", "http://evil.example")
        .header("Access-Control-Request-Method", "GET")
        .body(())
        .unwrap();

    let response = send(&state, req).await;
    assert_eq!(response.status(), 204);
    assert!(response
        .headers()
        .get("Access-Control-Allow-Origin")
        .is_none());
}

#[tokio::test]
async fn head_matches_get_without_body() {
    let state = test_state();
    let req = Request::builder()
        .method("HEAD")
        .uri("/api/message")
        .body(())
        .unwrap();

    let response = send(&state, req).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("Content-Type").unwrap(),
        "application/json"
    );
    let body = body_bytes(response).await;
    assert!(body.is_empty());
}

#[tokio::test]
async fn health_probes_respond() {
    let state = test_state();
    for path in ["/healthz", "/readyz"] {
        let req = Request::builder().method("GET").uri(path).body(()).unwrap();
        let response = send(&state, req).await;
        assert_eq!(response.status(), 200, "probe {path}");
        let body = body_bytes(response).await;
        assert_eq!(&body[..], b"ok");
    }
}

#[tokio::test]
async fn unknown_asset_is_404() {
    let state = test_state();
    let req = Request::builder()
        .method("GET")
        .uri("/no-such-page.html")
        .body(())
        .unwrap();

    let response = send(&state, req).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn index_is_served_at_root() {
    let state = test_state();
    let req = Request::builder().method("GET").uri("/").body(()).unwrap();

    let response = send(&state, req).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("Content-Type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert!(response.headers().get("ETag").is_some());
}

#[tokio::test]
async fn write_methods_are_rejected() {
    let state = test_state();
    for method in ["POST", "PUT", "DELETE", "PATCH"] {
        let req = Request::builder()
            .method(method)
            .uri("/api/message")
            .body(())
            .unwrap();
        let response = send(&state, req).await;
        assert_eq!(response.status(), 405, "method {method}");
        assert_eq!(response.headers().get("Allow").unwrap(), "GET, HEAD, OPTIONS");
    }
}

#[tokio::test]
async fn oversized_declared_body_is_rejected() {
    let state = test_state();
    let req = Request::builder()
        .method("GET")
        .uri("/api/message")
        .header("Content-Length", "999999999999")
        .body(())
        .unwrap();

    let response = send(&state, req).await;
    assert_eq!(response.status(), 413);
}

#[tokio::test]
async fn etag_roundtrip_yields_304() {
    let state = test_state();
    let req = Request::builder().method("GET").uri("/").body(()).unwrap();
    let first = send(&state, req).await;
    let etag = first
        .headers()
        .get("ETag")
        .expect("asset response carries an ETag")
        .to_str()
        .unwrap()
        .to_string();

    let req = Request::builder()
        .method("GET")
        .uri("/")
        .header("If-None-Match", etag.clone())
        .body(())
        .unwrap();
    let second = send(&state, req).await;
    assert_eq!(second.status(), 304);
    assert_eq!(second.headers().get("ETag").unwrap().to_str().unwrap(), etag);
}
