//! Static file serving module
//!
//! Serves the frontend assets: file loading, MIME type detection, and
//! response building with conditional-request support.

use crate::config::RoutesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a frontend asset for the request path
pub async fn serve_static(
    ctx: &RequestContext<'_>,
    routes: &RoutesConfig,
) -> Response<Full<Bytes>> {
    match load_from_directory(&routes.static_dir, ctx.path, &routes.index_files).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_response(content.len());
            }
            build_asset_response(
                &content,
                content_type,
                ctx.if_none_match.as_deref(),
                ctx.is_head,
            )
        }
        None => http::build_404_response(),
    }
}

/// Serve the favicon with a long-lived cache header
pub async fn serve_favicon(
    ctx: &RequestContext<'_>,
    routes: &RoutesConfig,
) -> Response<Full<Bytes>> {
    let file_name = ctx.path.trim_start_matches('/');
    let favicon_path = Path::new(&routes.static_dir).join(file_name);

    match fs::read(&favicon_path).await {
        Ok(data) => {
            if ctx.access_log {
                logger::log_response(data.len());
            }
            build_favicon_response(
                &data,
                mime::get_content_type(favicon_path.extension().and_then(|e| e.to_str())),
                ctx.if_none_match.as_deref(),
                ctx.is_head,
            )
        }
        Err(_) => http::build_404_response(),
    }
}

/// Load a static file from the asset directory with index file support
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let mut file_path = Path::new(static_dir).join(&clean_path);

    // Security: ensure file_path is within static_dir
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // Check if path is a directory, try index files
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.exists() && index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    // Determine content type from extension
    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Build asset response with `ETag` support
fn build_asset_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(data.to_owned()), content_type, &etag, is_head)
}

/// Build favicon response
fn build_favicon_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data.to_owned())
    };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=86400")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build favicon response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}
