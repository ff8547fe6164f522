// Configuration module entry point
// Loads application configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, DatabaseConfig, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig,
    RouteConfig, ServerConfig,
};

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// Missing files fall back to defaults; `WEBCOMMON_*` variables override both
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("WEBCOMMON")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.default_content_type", "text/html; charset=utf-8")?
            .set_default("http.server_name", "webcommon")?
            .set_default("web_root", ".")?
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
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let cfg = Config::load_from(missing.to_str().unwrap()).unwrap();

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.web_root, ".");
        assert!(cfg.routes.is_empty());
        assert!(cfg.health.enabled);
        assert_eq!(cfg.health.readiness_path, "/readyz");
        assert!(cfg.database.path.is_none());
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_routes_keep_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(
            &path,
            r#"
web_root = "public"

[server]
port = 9090

[database]
path = "app.db"

[[routes]]
request = "feed"
provide = "feed.xml"
header = "Content-Type: application/rss+xml"

[[routes]]
request = "about"
provide = "../pages/about.html"
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.web_root, "public");
        assert_eq!(cfg.database.path.as_deref(), Some("app.db"));
        assert_eq!(cfg.routes.len(), 2);
        assert_eq!(cfg.routes[0].request, "feed");
        assert_eq!(
            cfg.routes[0].header.as_deref(),
            Some("Content-Type: application/rss+xml")
        );
        assert_eq!(cfg.routes[1].provide, "../pages/about.html");
        assert!(cfg.routes[1].header.is_none());
    }

    #[test]
    fn test_invalid_address() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from(dir.path().join("absent").to_str().unwrap()).unwrap();
        cfg.server.host = "not an address".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
