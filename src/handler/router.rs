//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, CORS decoration, route matching, and access logging.

use crate::config::AppState;
use crate::handler::{api, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub access_log: bool,
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type; no handler reads the request body, so tests
/// can drive the full path with any placeholder body.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = version_label(req.version());
    let is_head = method == Method::HEAD;

    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);

    let origin = header_string(&req, "origin");
    let referer = header_string(&req, "referer");
    let user_agent = header_string(&req, "user-agent");

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let mut response = match method {
        // Preflight carries its own CORS headers
        Method::OPTIONS => state.cors.preflight(origin.as_deref()),
        Method::GET | Method::HEAD => {
            // Reject oversized declared bodies before touching routes
            if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
                resp
            } else {
                let ctx = RequestContext {
                    path: &path,
                    is_head,
                    if_none_match: header_string(&req, "if-none-match"),
                    access_log,
                };
                let mut resp = route_request(&ctx, &state).await;
                state.cors.decorate(origin.as_deref(), &mut resp);
                resp
            }
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            let mut resp = http::build_405_response();
            state.cors.decorate(origin.as_deref(), &mut resp);
            resp
        }
    };

    if let Ok(server_name) = hyper::header::HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert("Server", server_name);
    }

    if access_log {
        let entry = AccessLogEntry {
            remote_addr: peer_addr.ip().to_string(),
            time: chrono::Local::now(),
            method: method.to_string(),
            path,
            query,
            http_version: http_version.to_string(),
            status: response.status().as_u16(),
            body_bytes: body_len(&response),
            referer,
            user_agent,
            request_time_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and configuration
async fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let routes = &state.config.routes;

    // 1. Health check endpoints (highest priority, always fast)
    if routes.health.enabled {
        if ctx.path == routes.health.liveness_path {
            return http::build_health_response("ok");
        }
        if ctx.path == routes.health.readiness_path {
            return http::build_health_response("ok");
        }
    }

    // 2. The message API
    if ctx.path == api::MESSAGE_PATH {
        return api::serve_message(ctx.is_head);
    }

    // 3. Favicon routes
    if routes.favicon_paths.iter().any(|p| ctx.path == p) {
        return static_files::serve_favicon(ctx, routes).await;
    }

    // 4. Everything else is a frontend asset (404 when absent)
    static_files::serve_static(ctx, routes).await
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Extract a header as an owned string, skipping non-UTF-8 values
fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Response body length from the body's exact size hint
fn body_len(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body;
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
}

/// HTTP version label for access logs
fn version_label(version: hyper::Version) -> &'static str {
    if version == hyper::Version::HTTP_10 {
        "1.0"
    } else if version == hyper::Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}
