//! Minimal full-stack demo server.
//!
//! Serves a single-page frontend from a static asset directory and exposes
//! one JSON API route, `GET /api/message`, behind a configurable CORS origin
//! allow-list.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
