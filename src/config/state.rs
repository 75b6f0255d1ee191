// Application state module
// Immutable configuration shared across connections, plus cached flags

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::http::cors::CorsPolicy;

/// Application state
///
/// Built once at startup and shared behind an `Arc`; nothing here is
/// mutated per-request, so handlers read it lock-free.
pub struct AppState {
    pub config: Config,
    /// CORS allow-list, precompiled from `config.cors`
    pub cors: CorsPolicy,
    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            cors: CorsPolicy::from_config(&config.cors),
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }
}
