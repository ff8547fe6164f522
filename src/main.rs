use std::path::Path;
use std::sync::Arc;

use webcommon::config::{AppState, Config};
use webcommon::query::SqliteDatabase;
use webcommon::routing::RouteTable;
use webcommon::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config file path without extension, defaults to ./config.toml
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg).map_err(|e| e as Box<dyn std::error::Error>)?;

    // Worker threads follow `server.workers`, otherwise one per CPU core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Every route file must exist before the server accepts traffic
    let routes = RouteTable::from_config(Path::new(&cfg.web_root), &cfg.routes)?;
    let database = cfg
        .database
        .path
        .as_deref()
        .map(SqliteDatabase::open)
        .transpose()?;

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg, routes, database));
    server::start_server_loop(listener, state).await
}
