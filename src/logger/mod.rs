//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Route registration and access logging
//! - Error and warning logging
//! - File-based logging support
//!
//! Events go through `tracing`; `init` installs the subscriber.

pub mod writer;

use crate::config::Config;
use crate::routing::Route;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber with configuration
///
/// Should be called once at application startup. `RUST_LOG` takes precedence
/// over `logging.level`.
pub fn init(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;
    let writer = writer::make_writer(config.logging.log_file.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(config.logging.log_file.is_none())
        .with_target(false)
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        %addr,
        web_root = %config.web_root,
        routes = config.routes.len(),
        workers = ?config.server.workers,
        database = ?config.database.path,
        "server started"
    );
}

pub fn log_shutdown() {
    tracing::info!("shutdown signal received, no longer accepting connections");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(peer = %peer_addr, "connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!(error = ?err, "failed to serve connection");
}

pub fn log_request(method: &hyper::Method, path: &str) {
    tracing::info!(%method, path, "request");
}

pub fn log_route_registered(route: &Route) {
    tracing::info!(
        request = route.request_path(),
        file = %route.resolve_path().display(),
        header = ?route.header().map(ToString::to_string),
        "route registered"
    );
}

pub fn log_route_served(route: &Route, bytes: usize) {
    tracing::info!(
        request = route.request_path(),
        file = %route.resolve_path().display(),
        bytes,
        "route served"
    );
}

pub fn log_not_found(path: &str) {
    tracing::info!(path, "no route matched");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}
