// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Directory that route `provide` paths are relative to
    pub web_root: String,
    /// Static routes, evaluated in the order listed
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `webcommon=debug`
    pub level: String,
    pub access_log: bool,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Content-Type used when a route's header does not set one
    pub default_content_type: String,
    pub server_name: String,
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Database configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// SQLite database file; readiness skips the database check when unset
    #[serde(default)]
    pub path: Option<String>,
}

/// One static route entry
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    /// Request path without leading or trailing slash
    pub request: String,
    /// File to serve, relative to `web_root`
    pub provide: String,
    /// Optional single `Name: value` header
    #[serde(default)]
    pub header: Option<String>,
}
