//! CORS policy module
//!
//! Evaluates the request `Origin` against a configured allow-list and
//! decorates responses with the matching CORS headers. The server never
//! rejects a disallowed origin itself; it only withholds the
//! `Access-Control-Allow-Origin` header and leaves the blocking to the
//! browser.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::CorsConfig;
use crate::logger;

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Precompiled CORS allow-list policy
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    enabled: bool,
    allowed_origins: Vec<String>,
    allow_credentials: bool,
    max_age: u64,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Self {
        Self {
            enabled: config.enabled,
            allowed_origins: config.allowed_origins.clone(),
            allow_credentials: config.allow_credentials,
            max_age: config.max_age,
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Return the origin to echo back, if the request origin is allow-listed
    ///
    /// Matching is byte-exact: browsers serialize `Origin` in lowercase
    /// scheme://host[:port] form and the allow-list is written the same way.
    pub fn allow_origin<'a>(&self, origin: Option<&'a str>) -> Option<&'a str> {
        if !self.enabled {
            return None;
        }
        origin.filter(|o| self.allowed_origins.iter().any(|allowed| allowed == o))
    }

    /// Add CORS headers to an actual (non-preflight) response
    ///
    /// `Vary: Origin` is set whenever the policy is enabled, including for
    /// disallowed origins, so a cache never reuses an allow-listed response
    /// for a different caller.
    pub fn decorate(&self, origin: Option<&str>, response: &mut Response<Full<Bytes>>) {
        if !self.enabled {
            return;
        }

        insert_header(response, "Vary", "Origin");

        let Some(allowed) = self.allow_origin(origin) else {
            return;
        };

        insert_header(response, "Access-Control-Allow-Origin", allowed);
        if self.allow_credentials {
            insert_header(response, "Access-Control-Allow-Credentials", "true");
        }
    }

    /// Build the response to a preflight OPTIONS request
    ///
    /// Disallowed and absent origins still get a plain 204 with `Allow`,
    /// matching how non-CORS OPTIONS requests are answered.
    pub fn preflight(&self, origin: Option<&str>) -> Response<Full<Bytes>> {
        let mut builder = Response::builder()
            .status(204)
            .header("Allow", ALLOWED_METHODS);

        if self.enabled {
            builder = builder.header("Vary", "Origin");
        }

        if let Some(allowed) = self.allow_origin(origin) {
            builder = builder
                .header("Access-Control-Allow-Origin", allowed)
                .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
                .header("Access-Control-Allow-Headers", ALLOWED_HEADERS)
                .header("Access-Control-Max-Age", self.max_age);
            if self.allow_credentials {
                builder = builder.header("Access-Control-Allow-Credentials", "true");
            }
        }

        builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build preflight response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
    }
}

/// Insert a header on an already-built response, skipping invalid values
fn insert_header(response: &mut Response<Full<Bytes>>, name: &'static str, value: &str) {
    match hyper::header::HeaderValue::from_str(value) {
        Ok(v) => {
            response.headers_mut().insert(name, v);
        }
        Err(e) => {
            logger::log_error(&format!("Invalid {name} header value '{value}': {e}"));
        }
    }
}
