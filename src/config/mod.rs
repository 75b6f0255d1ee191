// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, CorsConfig, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig,
    ServerConfig,
};

impl Config {
    /// Load configuration from the default "config.toml" location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Missing files are fine; environment variables with the `SERVER`
    /// prefix override file values, and coded defaults fill the rest.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("cors.enabled", true)?
            .set_default(
                "cors.allowed_origins",
                vec![
                    "http://localhost:5173",
                    "http://localhost:5174",
                    "http://localhost:3000",
                ],
            )?
            .set_default("cors.allow_credentials", true)?
            .set_default("cors.max_age", 86_400)?
            .set_default("routes.static_dir", "static")?
            .set_default("routes.index_files", vec!["index.html", "index.htm"])?
            .set_default("routes.favicon_paths", vec!["/favicon.ico", "/favicon.svg"])?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "hello-stack/0.1")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from("nonexistent-config").expect("defaults should deserialize");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.cors.enabled);
        assert!(cfg.cors.allow_credentials);
        assert_eq!(
            cfg.cors.allowed_origins,
            vec![
                "http://localhost:5173",
                "http://localhost:5174",
                "http://localhost:3000",
            ]
        );
        assert_eq!(cfg.routes.static_dir, "static");
        assert!(cfg.routes.health.enabled);
        assert_eq!(cfg.routes.health.liveness_path, "/healthz");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("nonexistent-config").expect("defaults should deserialize");
        let addr = cfg.get_socket_addr().expect("default addr should parse");
        assert_eq!(addr.port(), 3000);
    }
}
