//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from
//! specific business logic: CORS policy evaluation, response builders,
//! MIME detection, and conditional-request handling.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cors::CorsPolicy;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_health_response, build_json_response,
};
